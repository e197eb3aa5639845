//! Typed view of a scene document.
//!
//! | section    | keys (default)                                                              |
//! |------------|-----------------------------------------------------------------------------|
//! | `function` | `id` (required), `expression` (required for `custom`)                       |
//! | `interval` | `a` (-2), `b` (4), `step` ((b - a) / 200)                                   |
//! | `family`   | `constants` (-3, -1.5, 0, 1.5, 3), `selected` (0), `scaling` (false)       |
//! | `window`   | `x_min`, `x_max`, `y_min`, `y_max` (fitted to the samples)                  |
//! | `viewport` | `width` (800), `height` (400), `padding` (60)                               |
//! | `solver`   | `tolerance` (0.01), `max_iterations` (50), `samples` (1000)                 |
//! | `view`     | `secant` (true), `tower` (false), `estimate` (none)                         |
//! | `output`   | `file` (scene.svg), `csv` (none), `loglevel` (info)                         |
//!
//! The family is only drawn when the document has a `family` section.
use crate::Utils::task_parser::{DocumentMap, SectionMap, Value, lookup, parse_document_as};
use crate::errors::{ConfigError, CoreError};
use crate::numerical::curve_sampler::FamilyScaling;
use crate::numerical::domain::{DomainWindow, Interval, Viewport};
use crate::numerical::function_registry::{FunctionId, FunctionRegistry};
use crate::numerical::mean_value_solver::SolverConfig;
use crate::numerical::scene::SceneParameters;
use log::warn;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const SECTIONS: [(&str, &[&str]); 8] = [
    ("function", &["id", "expression"]),
    ("interval", &["a", "b", "step"]),
    ("family", &["constants", "selected", "scaling"]),
    ("window", &["x_min", "x_max", "y_min", "y_max"]),
    ("viewport", &["width", "height", "padding"]),
    ("solver", &["tolerance", "max_iterations", "samples"]),
    ("view", &["secant", "tower", "estimate"]),
    ("output", &["file", "csv", "loglevel"]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub function: FunctionId,
    pub expression: Option<String>,
    pub interval: Interval,
    pub step: f64,
    pub family_constants: Vec<f64>,
    pub selected_constant: Option<f64>,
    pub family_scaling: Option<FamilyScaling>,
    pub window: Option<DomainWindow>,
    pub viewport: Viewport,
    pub solver: SolverConfig,
    pub show_secant: bool,
    pub show_tower: bool,
    pub user_estimate: Option<f64>,
    pub output_file: PathBuf,
    pub csv_file: Option<PathBuf>,
    pub loglevel: String,
}

impl SceneConfig {
    /// Every known section and key, all `None`.
    pub fn template() -> DocumentMap {
        SECTIONS
            .iter()
            .map(|(section, keys)| {
                let keys: SectionMap = keys.iter().map(|k| (k.to_string(), None)).collect();
                (section.to_string(), keys)
            })
            .collect()
    }

    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let template = Self::template();
        let document = parse_document_as(input, Some(&template))?;
        SceneConfig::try_from(&document)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Registry holding the custom expression, if any. A broken expression is logged and
    /// drawn as zero.
    pub fn registry(&self) -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        if let Some(expression) = &self.expression {
            if let Err(e) = registry.set_custom_expression(expression) {
                warn!("custom expression `{}` will be drawn as 0: {}", expression, e);
            }
        }
        registry
    }

    pub fn scene_parameters(&self) -> SceneParameters {
        SceneParameters {
            function: self.function,
            interval: self.interval,
            step: self.step,
            family_constants: self.family_constants.clone(),
            selected_constant: self.selected_constant,
            family_scaling: self.family_scaling,
            window: self.window,
            viewport: self.viewport,
            solver: self.solver,
            user_estimate: self.user_estimate,
            show_secant: self.show_secant,
            show_tower: self.show_tower,
        }
    }
}

fn invalid(key: &str, values: &[Value]) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: values
            .iter()
            .map(Value::to_string_value)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn single<'a>(
    document: &'a DocumentMap,
    section: &str,
    key: &str,
) -> Result<Option<&'a Value>, ConfigError> {
    match lookup(document, section, key) {
        None => Ok(None),
        Some([value]) => Ok(Some(value)),
        Some(values) => Err(invalid(key, values)),
    }
}

fn real(document: &DocumentMap, section: &str, key: &str) -> Result<Option<f64>, ConfigError> {
    match single(document, section, key)? {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(key, std::slice::from_ref(value))),
    }
}

fn count(document: &DocumentMap, section: &str, key: &str) -> Result<Option<usize>, ConfigError> {
    match single(document, section, key)? {
        None => Ok(None),
        Some(value) => value
            .as_usize()
            .map(Some)
            .ok_or_else(|| invalid(key, std::slice::from_ref(value))),
    }
}

fn flag(document: &DocumentMap, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
    match single(document, section, key)? {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| invalid(key, std::slice::from_ref(value))),
    }
}

fn text(document: &DocumentMap, section: &str, key: &str) -> Result<Option<String>, ConfigError> {
    Ok(single(document, section, key)?.map(Value::to_string_value))
}

fn precondition(key: &str, e: impl Into<CoreError>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: e.into().to_string(),
    }
}

fn warn_unknown_keys(document: &DocumentMap) {
    let known: HashMap<&str, &[&str]> = SECTIONS.iter().copied().collect();
    for (section, keys) in document {
        match known.get(section.as_str()) {
            None => warn!("unknown section `{}` ignored", section),
            Some(expected) => {
                for key in keys.keys().filter(|k| !expected.contains(&k.as_str())) {
                    warn!("unknown key `{}` in section `{}` ignored", key, section);
                }
            }
        }
    }
}

impl TryFrom<&DocumentMap> for SceneConfig {
    type Error = ConfigError;

    fn try_from(document: &DocumentMap) -> Result<Self, Self::Error> {
        warn_unknown_keys(document);

        let id = text(document, "function", "id")?.ok_or_else(|| ConfigError::MissingKey {
            section: "function".to_string(),
            key: "id".to_string(),
        })?;
        let function = FunctionId::from_str(&id).map_err(|_| ConfigError::InvalidValue {
            key: "id".to_string(),
            value: id.clone(),
        })?;
        let expression = text(document, "function", "expression")?;
        if function == FunctionId::Custom && expression.is_none() {
            return Err(ConfigError::MissingKey {
                section: "function".to_string(),
                key: "expression".to_string(),
            });
        }

        let a = real(document, "interval", "a")?.unwrap_or(-2.0);
        let b = real(document, "interval", "b")?.unwrap_or(4.0);
        let interval = Interval::new(a, b).map_err(|e| precondition("interval", e))?;
        let step = real(document, "interval", "step")?.unwrap_or(interval.width() / 200.0);
        if !(step.is_finite() && step > 0.0) {
            return Err(invalid("step", &[Value::Float(step)]));
        }

        let has_family = document
            .get("family")
            .is_some_and(|keys| keys.values().any(Option::is_some));
        let (family_constants, selected_constant, family_scaling) = if has_family {
            let constants = match lookup(document, "family", "constants") {
                Some(values) => values
                    .iter()
                    .map(|v| v.as_f64().ok_or_else(|| invalid("constants", values)))
                    .collect::<Result<Vec<f64>, _>>()?,
                None => vec![-3.0, -1.5, 0.0, 1.5, 3.0],
            };
            let selected = real(document, "family", "selected")?.unwrap_or(0.0);
            let scaling = flag(document, "family", "scaling")?
                .unwrap_or(false)
                .then(FamilyScaling::reference);
            (constants, Some(selected), scaling)
        } else {
            (Vec::new(), None, None)
        };

        let window_keys = [
            real(document, "window", "x_min")?,
            real(document, "window", "x_max")?,
            real(document, "window", "y_min")?,
            real(document, "window", "y_max")?,
        ];
        let window = match window_keys {
            [None, None, None, None] => None,
            [Some(x_min), Some(x_max), Some(y_min), Some(y_max)] => Some(
                DomainWindow::new(x_min, x_max, y_min, y_max)
                    .map_err(|e| precondition("window", e))?,
            ),
            _ => {
                return Err(ConfigError::MissingKey {
                    section: "window".to_string(),
                    key: "x_min, x_max, y_min, y_max".to_string(),
                });
            }
        };

        let viewport = Viewport::new(
            real(document, "viewport", "width")?.unwrap_or(800.0),
            real(document, "viewport", "height")?.unwrap_or(400.0),
            real(document, "viewport", "padding")?.unwrap_or(60.0),
        )
        .map_err(|e| precondition("viewport", e))?;

        let defaults = SolverConfig::default();
        let solver = SolverConfig::default()
            .with_tolerance(real(document, "solver", "tolerance")?.unwrap_or(defaults.tolerance))
            .with_max_iterations(
                count(document, "solver", "max_iterations")?.unwrap_or(defaults.max_iterations),
            )
            .with_samples(count(document, "solver", "samples")?.unwrap_or(defaults.samples));
        if !(solver.tolerance > 0.0) || solver.samples == 0 {
            return Err(ConfigError::InvalidValue {
                key: "solver".to_string(),
                value: format!("{:?}", solver),
            });
        }

        let user_estimate = real(document, "view", "estimate")?;
        if let Some(estimate) = user_estimate {
            if !interval.contains(estimate) {
                return Err(invalid("estimate", &[Value::Float(estimate)]));
            }
        }

        let loglevel = text(document, "output", "loglevel")?.unwrap_or_else(|| "info".to_string());

        Ok(SceneConfig {
            function,
            expression,
            interval,
            step,
            family_constants,
            selected_constant,
            family_scaling,
            window,
            viewport,
            solver,
            show_secant: flag(document, "view", "secant")?.unwrap_or(true),
            show_tower: flag(document, "view", "tower")?.unwrap_or(false),
            user_estimate,
            output_file: text(document, "output", "file")?
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("scene.svg")),
            csv_file: text(document, "output", "csv")?.map(PathBuf::from),
            loglevel,
        })
    }
}
