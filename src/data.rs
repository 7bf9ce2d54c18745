use std::fmt;

/// Strings treated as a missing cell when reading delimited text.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_VALUES: &[&str] = &["True", "TRUE", "true"];
const FALSE_VALUES: &[&str] = &["False", "FALSE", "false"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_number(*f),
            Value::Boolean(b) => if *b { "True" } else { "False" }.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let formatted = format!("{value:.4}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// True for the listed NA spellings and for any spelling the float parser
/// would turn into NaN (`NAN`, `+nan`, ...).
pub fn is_na(raw: &str) -> bool {
    NA_VALUES.contains(&raw)
        || raw
            .trim()
            .trim_start_matches(['+', '-'])
            .eq_ignore_ascii_case("nan")
}

pub fn parse_boolean(raw: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&raw) {
        Some(true)
    } else if FALSE_VALUES.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

/// Tracks which types every non-missing field of a column could still be.
#[derive(Debug, Clone)]
pub struct TypeCandidate {
    possible_integer: bool,
    possible_float: bool,
    possible_boolean: bool,
    seen_value: bool,
    seen_missing: bool,
}

impl Default for TypeCandidate {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCandidate {
    pub fn new() -> Self {
        Self {
            possible_integer: true,
            possible_float: true,
            possible_boolean: true,
            seen_value: false,
            seen_missing: false,
        }
    }

    pub fn observe(&mut self, field: Option<&str>) {
        let Some(raw) = field else {
            self.seen_missing = true;
            return;
        };
        self.seen_value = true;
        if self.possible_integer && raw.trim().parse::<i64>().is_err() {
            self.possible_integer = false;
        }
        if self.possible_float && raw.trim().parse::<f64>().is_err() {
            self.possible_float = false;
        }
        if self.possible_boolean && parse_boolean(raw).is_none() {
            self.possible_boolean = false;
        }
    }

    pub fn decide(&self) -> ColumnType {
        if !self.seen_value {
            ColumnType::Float
        } else if self.possible_integer && !self.seen_missing {
            ColumnType::Integer
        } else if self.possible_float {
            ColumnType::Float
        } else if self.possible_boolean && !self.seen_missing {
            ColumnType::Boolean
        } else {
            ColumnType::Text
        }
    }
}

/// Parses a raw field into a value of the given column type.
///
/// Returns `None` for fields that cannot be represented in `ty`.
pub fn parse_typed_value(raw: &str, ty: ColumnType) -> Option<Value> {
    match ty {
        ColumnType::Integer => raw.trim().parse().ok().map(Value::Integer),
        ColumnType::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| !f.is_nan())
            .map(Value::Float),
        ColumnType::Boolean => parse_boolean(raw).map(Value::Boolean),
        ColumnType::Text => Some(Value::Text(raw.to_string())),
    }
}
