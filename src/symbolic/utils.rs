// the collection of utility functions for bracket parsing and operator scanning

/// true when every `(` has a matching `)` and no `)` closes an unopened bracket
pub fn brackets_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// byte position of the `)` that closes the `(` found at byte position `bracket_start`
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in input[bracket_start..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(bracket_start + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// true if the whole string is one bracketed group, e.g. `(x+1)` but not `(x)+(1)`
pub fn wrapped_in_brackets(s: &str) -> bool {
    s.starts_with('(') && find_pair_to_this_bracket(s, 0) == Some(s.len() - 1)
}

/// An operator occurrence is binary when something other than another operator or an
/// opening bracket stands before it. A sign right after the `e` of a numeric literal
/// (`1e-3`) belongs to the literal.
fn is_binary_sign(chars: &[(usize, char)], idx: usize) -> bool {
    let prev = chars[..idx].iter().rev().find(|(_, c)| !c.is_whitespace());
    match prev {
        None => false,
        Some((prev_pos, prev_char)) => {
            if matches!(prev_char, '+' | '-' | '*' | '/' | '^' | '(') {
                return false;
            }
            if matches!(prev_char, 'e' | 'E') {
                // find index of prev in chars and look one further back
                let prev_idx = chars.iter().position(|(p, _)| p == prev_pos).unwrap_or(0);
                if prev_idx > 0 {
                    let before = chars[prev_idx - 1].1;
                    if before.is_ascii_digit() || before == '.' {
                        return !literal_starts_with_digit(chars, prev_idx);
                    }
                }
            }
            true
        }
    }
}

/// walks back from the exponent marker to the start of the token and checks that the token is
/// numeric (`2.5e-3`) rather than an identifier that happens to end with a digit (`x1e-3`)
fn literal_starts_with_digit(chars: &[(usize, char)], exp_idx: usize) -> bool {
    let mut i = exp_idx;
    while i > 0 {
        let c = chars[i - 1].1;
        if c.is_ascii_digit() || c == '.' {
            i -= 1;
        } else {
            return !(c.is_alphabetic() || c == '_');
        }
    }
    true
}

/// function to find the rightmost binary `+`/`-` at bracket depth zero.
/// Rightmost split keeps subtraction left-associative: `a-b-c` = `(a-b)-c`.
pub fn find_rightmost_sign_outside_brackets(input: &str) -> Option<(usize, char)> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut depth = 0i64;
    let mut found = None;
    for (idx, &(pos, c)) in chars.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '+' | '-' if depth == 0 && is_binary_sign(&chars, idx) => found = Some((pos, c)),
            _ => {}
        }
    }
    found
}

/// rightmost `*` or `/` at bracket depth zero
pub fn find_rightmost_product_outside_brackets(input: &str) -> Option<(usize, char)> {
    let mut depth = 0i64;
    let mut found = None;
    for (pos, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '*' | '/' if depth == 0 => found = Some((pos, c)),
            _ => {}
        }
    }
    found
}

/// leftmost `^` at bracket depth zero; splitting there makes power right-associative
pub fn find_leftmost_power_outside_brackets(input: &str) -> Option<usize> {
    let mut depth = 0i64;
    for (pos, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '^' if depth == 0 => return Some(pos),
            _ => {}
        }
    }
    None
}
