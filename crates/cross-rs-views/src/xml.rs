//! JSON value to XML conversion for the `XML` display method.
//!
//! Objects become child elements and arrays repeat their element name. Two
//! reserved object keys control the element itself:
//!
//! - `@attributes`: an object of attribute names to scalar values
//! - `@value` / `@cdata`: the element text, escaped or wrapped in `CDATA`
//!
//! # Examples
//!
//! ```
//! use cross_rs_views::xml::to_xml;
//! use serde_json::json;
//!
//! let xml = to_xml("root", &json!({"tag": ["a", "b"], "count": 2})).unwrap();
//! assert_eq!(
//!     xml,
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
//!      <root><tag>a</tag><tag>b</tag><count>2</count></root>\n"
//! );
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use cross_rs_core::{CrossError, CrossResult};

/// The XML declaration every document starts with.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Element name used for the items of a top-level array.
pub const ITEM_ELEMENT: &str = "item";

const ATTRIBUTES_KEY: &str = "@attributes";
const VALUE_KEY: &str = "@value";
const CDATA_KEY: &str = "@cdata";

static TAG_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9:\-._]*$").expect("tag name pattern is valid")
});

/// Serializes `value` as an XML document whose root element is `root`.
///
/// # Errors
///
/// Returns [`CrossError::SerializationError`] when a key is not a valid XML
/// element or attribute name, or when an attribute value is not a scalar.
pub fn to_xml(root: &str, value: &Value) -> CrossResult<String> {
    let mut out = String::from(XML_DECLARATION);
    out.push('\n');

    match value {
        Value::Array(items) => {
            check_name(root)?;
            out.push('<');
            out.push_str(root);
            out.push('>');
            for item in items {
                write_element(&mut out, ITEM_ELEMENT, item)?;
            }
            out.push_str("</");
            out.push_str(root);
            out.push('>');
        }
        other => write_element(&mut out, root, other)?,
    }

    out.push('\n');
    Ok(out)
}

fn write_element(out: &mut String, name: &str, value: &Value) -> CrossResult<()> {
    check_name(name)?;

    match value {
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item)?;
            }
        }
        Value::Object(map) => {
            out.push('<');
            out.push_str(name);
            write_attributes(out, map)?;
            out.push('>');

            if let Some(text) = map.get(CDATA_KEY) {
                out.push_str("<![CDATA[");
                out.push_str(&scalar_text(text).replace("]]>", "]]]]><![CDATA[>"));
                out.push_str("]]>");
            } else if let Some(text) = map.get(VALUE_KEY) {
                out.push_str(&escape(&scalar_text(text)));
            } else {
                for (child, child_value) in map {
                    if !child.starts_with('@') {
                        write_element(out, child, child_value)?;
                    }
                }
            }

            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Value::Null => {
            out.push('<');
            out.push_str(name);
            out.push_str("/>");
        }
        scalar => {
            out.push('<');
            out.push_str(name);
            out.push('>');
            out.push_str(&escape(&scalar_text(scalar)));
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }

    Ok(())
}

fn write_attributes(out: &mut String, map: &Map<String, Value>) -> CrossResult<()> {
    let Some(attributes) = map.get(ATTRIBUTES_KEY) else {
        return Ok(());
    };
    let Value::Object(attributes) = attributes else {
        return Err(CrossError::SerializationError(format!(
            "{ATTRIBUTES_KEY} must be an object"
        )));
    };

    for (name, value) in attributes {
        check_name(name)?;
        if value.is_array() || value.is_object() {
            return Err(CrossError::SerializationError(format!(
                "attribute '{name}' must be a scalar"
            )));
        }
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(&scalar_text(value)));
        out.push('"');
    }

    Ok(())
}

fn check_name(name: &str) -> CrossResult<()> {
    if TAG_NAME.is_match(name) {
        Ok(())
    } else {
        Err(CrossError::SerializationError(format!(
            "illegal XML name '{name}'"
        )))
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Escapes text for use in XML content or attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
