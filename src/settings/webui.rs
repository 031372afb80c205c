//! UI description hook.
//!
//! Settings with a UI name describe themselves to a [`UiSink`]. The JSON
//! sink produces the array served by `ESP400`.

use serde_json::{json, Map, Value};

/// Type-specific constraints of a UI-visible setting
#[derive(Debug, Clone, Copy)]
pub enum UiKind<'a> {
    Integer { min: i32, max: i32 },
    Text { min_len: usize, max_len: usize },
    Select(&'a [(&'static str, i8)]),
    Address,
}

/// One UI-visible setting
#[derive(Debug, Clone)]
pub struct UiItem<'a> {
    pub ui_name: &'a str,
    pub name: &'a str,
    pub value: String,
    pub kind: UiKind<'a>,
}

/// Receiver of UI descriptions
pub trait UiSink {
    fn setting(&mut self, item: UiItem<'_>);
}

/// Builds the WebUI JSON array (`F`older, `P`ath, `T`ype, `V`alue,
/// `H`elp label, `M`in, `S`ize/max, `O`ptions)
#[derive(Debug, Default)]
pub struct JsonUiSink {
    items: Vec<Value>,
}

impl JsonUiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `{"EEPROM":[...]}` document
    pub fn into_value(self) -> Value {
        json!({ "EEPROM": self.items })
    }
}

fn folder(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

impl UiSink for JsonUiSink {
    fn setting(&mut self, item: UiItem<'_>) {
        let mut obj = Map::new();
        obj.insert("F".into(), json!(folder(item.name)));
        obj.insert("P".into(), json!(item.name));
        obj.insert("V".into(), json!(item.value));
        obj.insert("H".into(), json!(item.ui_name));
        match item.kind {
            UiKind::Integer { min, max } => {
                obj.insert("T".into(), json!("I"));
                obj.insert("M".into(), json!(min.to_string()));
                obj.insert("S".into(), json!(max.to_string()));
            }
            UiKind::Text { min_len, max_len } => {
                obj.insert("T".into(), json!("S"));
                obj.insert("M".into(), json!(min_len.to_string()));
                obj.insert("S".into(), json!(max_len.to_string()));
            }
            UiKind::Select(options) => {
                obj.insert("T".into(), json!("B"));
                let opts: Vec<Value> = options
                    .iter()
                    .map(|(name, v)| {
                        let mut opt = Map::new();
                        opt.insert(name.to_string(), json!(v.to_string()));
                        Value::Object(opt)
                    })
                    .collect();
                obj.insert("O".into(), Value::Array(opts));
            }
            UiKind::Address => {
                obj.insert("T".into(), json!("A"));
            }
        }
        self.items.push(Value::Object(obj));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_select_item() {
        let mut sink = JsonUiSink::new();
        sink.setting(UiItem {
            ui_name: "HTTP protocol",
            name: "Http/Enable",
            value: "1".into(),
            kind: UiKind::Select(&[("Disable", 0), ("Enable", 1)]),
        });
        let doc = sink.into_value();
        let item = &doc["EEPROM"][0];
        assert_eq!(item["F"], "Http");
        assert_eq!(item["T"], "B");
        assert_eq!(item["O"][1]["Enable"], "1");
    }
}
