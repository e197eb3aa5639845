//! different utility modules used throughout the project
/// logger setup and csv export of sampled curves
pub mod logger;
/// tiny module to draw a scene into an svg or png file
pub mod plots;
/// tables with the solution, the bisection trace and the function catalog
pub mod report;
/// typed scene settings read from a task document
pub mod scene_config;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
