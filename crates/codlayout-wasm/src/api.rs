use codlayout_core::{AreaColors, LayoutArea, LayoutFormula, LayoutSpan, ParseOutcome};
use codlayout_formula::{Dialect, FormulaSource, LayoutFormulaService, UnknownDialect};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Errors raised by the JavaScript API (never by formula parsing, which
/// reports through `ParseOutcome`)
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Dialect(#[from] UnknownDialect),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Json(_) => "INVALID_JSON",
            ApiError::Dialect(_) => "UNKNOWN_DIALECT",
        }
    }
}

/// Structured error object for JavaScript
#[derive(Serialize)]
struct JsApiError {
    code: String,
    message: String,
}

fn to_js_error(err: ApiError) -> JsValue {
    let js_error = JsApiError {
        code: err.code().to_string(),
        message: err.to_string(),
    };
    serde_wasm_bindgen::to_value(&js_error).unwrap_or(JsValue::NULL)
}

/// A formula given to `filterFormulaLabels`: its text or its model
#[derive(Deserialize)]
#[serde(untagged)]
enum FormulaInput {
    Text(String),
    Model(LayoutFormula),
}

/// Spans given either alone or inside their formula
#[derive(Deserialize)]
#[serde(untagged)]
enum SpansInput {
    Spans(Vec<LayoutSpan>),
    Formula(LayoutFormula),
}

impl SpansInput {
    fn into_spans(self) -> Vec<LayoutSpan> {
        match self {
            SpansInput::Spans(spans) => spans,
            SpansInput::Formula(formula) => formula.spans,
        }
    }
}

/// Layout formula engine for one dialect, exposed to JavaScript.
///
/// Structured arguments and results are JSON strings using the camelCase
/// model shape (`type`, `isOriginal`, `isHorizontal`, `rowIndexes`...).
#[wasm_bindgen]
pub struct LayoutFormulaEngine {
    dialect: Dialect,
    service: Box<dyn LayoutFormulaService>,
}

#[wasm_bindgen]
impl LayoutFormulaEngine {
    /// Create an engine for `BO` or `IT` (case-insensitive)
    #[wasm_bindgen(constructor)]
    pub fn new(dialect: &str) -> Result<LayoutFormulaEngine, JsValue> {
        dialect
            .parse::<Dialect>()
            .map(Self::with_dialect)
            .map_err(|e| to_js_error(e.into()))
    }

    #[wasm_bindgen(getter)]
    pub fn dialect(&self) -> String {
        self.dialect.to_string()
    }

    /// Parse a formula; returns `{result}` or `{error}` as JSON
    #[wasm_bindgen(js_name = parseFormula)]
    pub fn parse_formula(&self, text: &str) -> String {
        self.parse_json(text)
    }

    #[wasm_bindgen(js_name = buildFormula)]
    pub fn build_formula(&self, formula_json: &str) -> Result<String, JsValue> {
        self.build_json(formula_json).map_err(to_js_error)
    }

    /// Validate a formula text; returns `null` or the errors map as JSON
    #[wasm_bindgen(js_name = validateFormula)]
    pub fn validate_formula(&self, text: &str) -> String {
        self.validate_json(text)
    }

    #[wasm_bindgen(js_name = validateFormulaSize)]
    pub fn validate_formula_size(&self, formula_json: &str) -> Result<String, JsValue> {
        self.validate_size_json(formula_json).map_err(to_js_error)
    }

    /// Areas of a spans array or of a whole formula
    #[wasm_bindgen(js_name = getAreas)]
    pub fn get_areas(&self, spans_json: &str) -> Result<String, JsValue> {
        self.areas_json(spans_json).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = filterAreas)]
    pub fn filter_areas(&self, name: &str, areas_json: &str) -> Result<String, JsValue> {
        self.filter_areas_json(name, areas_json).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = mapAreaColors)]
    pub fn map_area_colors(&self, areas_json: &str, colors_json: &str) -> Result<String, JsValue> {
        self.map_area_colors_json(areas_json, colors_json)
            .map_err(to_js_error)
    }

    /// `formula_json` is a JSON string holding the formula text, or the model
    #[wasm_bindgen(js_name = filterFormulaLabels)]
    pub fn filter_formula_labels(&self, formula_json: &str, labels_json: &str) -> Result<String, JsValue> {
        self.filter_labels_json(formula_json, labels_json)
            .map_err(to_js_error)
    }
}

impl LayoutFormulaEngine {
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            service: dialect.service(),
        }
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
    }

    pub fn parse_json(&self, text: &str) -> String {
        let outcome = ParseOutcome::from(self.service.parse_formula(text));
        Self::to_json(&outcome)
    }

    pub fn build_json(&self, formula_json: &str) -> Result<String, ApiError> {
        let formula: LayoutFormula = serde_json::from_str(formula_json)?;
        Ok(self.service.build_formula(&formula))
    }

    pub fn validate_json(&self, text: &str) -> String {
        Self::to_json(&self.service.validate_formula(text))
    }

    pub fn validate_size_json(&self, formula_json: &str) -> Result<String, ApiError> {
        let formula: LayoutFormula = serde_json::from_str(formula_json)?;
        Ok(Self::to_json(&self.service.validate_formula_size(&formula)))
    }

    pub fn areas_json(&self, spans_json: &str) -> Result<String, ApiError> {
        let spans = serde_json::from_str::<SpansInput>(spans_json)?.into_spans();
        Ok(Self::to_json(&self.service.get_areas(&spans)))
    }

    pub fn filter_areas_json(&self, name: &str, areas_json: &str) -> Result<String, ApiError> {
        let areas: Vec<LayoutArea> = serde_json::from_str(areas_json)?;
        Ok(Self::to_json(&self.service.filter_areas(name, &areas)))
    }

    pub fn map_area_colors_json(&self, areas_json: &str, colors_json: &str) -> Result<String, ApiError> {
        let areas: Vec<LayoutArea> = serde_json::from_str(areas_json)?;
        let colors: AreaColors = serde_json::from_str(colors_json)?;
        Ok(Self::to_json(&self.service.map_area_colors(&areas, &colors)))
    }

    pub fn filter_labels_json(&self, formula_json: &str, labels_json: &str) -> Result<String, ApiError> {
        let formula: FormulaInput = serde_json::from_str(formula_json)?;
        let labels: Vec<String> = serde_json::from_str(labels_json)?;
        let source = match &formula {
            FormulaInput::Text(text) => FormulaSource::Text(text),
            FormulaInput::Model(model) => FormulaSource::Model(model),
        };
        Ok(Self::to_json(&self.service.filter_formula_labels(source, &labels)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const BO: &str = "20 x 10 = 4:mt // 10 // 6 x 2 // 7 // 1";

    fn engine(dialect: Dialect) -> LayoutFormulaEngine {
        LayoutFormulaEngine::with_dialect(dialect)
    }

    fn value(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_json_shapes() {
        let engine = engine(Dialect::Bo);

        let parsed = value(&engine.parse_json(BO));
        assert_eq!(parsed["result"]["type"], "BO");
        assert_eq!(parsed["result"]["unit"], "mm");
        assert_eq!(parsed["result"]["height"], json!({ "value": 20.0, "isOriginal": true }));
        assert_eq!(parsed["result"]["spans"][0]["label"], "mt");
        assert_eq!(parsed["result"]["spans"][1]["type"], "text");
        assert!(parsed.get("error").is_none());

        assert_eq!(value(&engine.parse_json("")), json!({ "result": null }));

        let failed = value(&engine.parse_json("20 x 10 = 5 // 10 / 15"));
        assert_eq!(failed["error"]["message"], "Odd number of '//' in formula");
        assert_eq!(failed["error"]["kind"], "malformedDelimiters");
    }

    #[test]
    fn test_build_from_json() {
        let engine = engine(Dialect::Bo);
        let parsed = value(&engine.parse_json(BO));
        let built = engine.build_json(&parsed["result"].to_string()).unwrap();
        assert_eq!(built, "mm 20 x 10 = 4:mt // 10 // 6 x 2 // 7 // 1");

        let err = engine.build_json("{").unwrap_err();
        assert_eq!(err.code(), "INVALID_JSON");
    }

    #[test]
    fn test_validate_json() {
        let engine = engine(Dialect::It);
        assert_eq!(engine.validate_json(" "), "null");
        let errors = value(&engine.validate_json("250 x 160 = 30 [170] 40 x 15 [130] 15"));
        assert_eq!(errors, json!({ "height": "Height 250 does not match v-spans sum 240" }));
    }

    #[test]
    fn test_areas_from_spans_or_formula() {
        let engine = engine(Dialect::Bo);
        let parsed = value(&engine.parse_json(BO));

        let from_formula = value(&engine.areas_json(&parsed["result"].to_string()).unwrap());
        let from_spans = value(&engine.areas_json(&parsed["result"]["spans"].to_string()).unwrap());
        assert_eq!(from_formula, from_spans);
        assert_eq!(from_formula.as_array().map(Vec::len), Some(9));
        assert_eq!(from_formula[0], json!({ "y": 1, "x": 1, "rowIndexes": ["mt"], "colIndexes": [] }));
    }

    #[test]
    fn test_filter_and_color_areas() {
        let engine = engine(Dialect::Bo);
        let parsed = value(&engine.parse_json(BO));
        let areas = engine.areas_json(&parsed["result"].to_string()).unwrap();

        let text = value(&engine.filter_areas_json("$text_$text", &areas).unwrap());
        assert_eq!(text.as_array().map(Vec::len), Some(1));

        let colors = engine
            .map_area_colors_json(&areas, r##"{"mt_": "#f00", "@1_3": "#0f0"}"##)
            .unwrap();
        assert_eq!(colors, r##"{"@1_1":"#f00","@1_2":"#f00","@1_3":"#0f0"}"##);
    }

    #[test]
    fn test_filter_labels_from_text_or_model() {
        let engine = engine(Dialect::Bo);
        let labels = r#"["mt", "initials"]"#;

        let from_text = engine
            .filter_labels_json(&serde_json::to_string(BO).unwrap(), labels)
            .unwrap();
        assert_eq!(from_text, r#"["mt"]"#);

        let parsed = value(&engine.parse_json(BO));
        let from_model = engine
            .filter_labels_json(&parsed["result"].to_string(), labels)
            .unwrap();
        assert_eq!(from_model, r#"["mt"]"#);
    }

    #[test]
    fn test_dialect_name() {
        assert_eq!(engine(Dialect::It).dialect(), "IT");
    }
}
