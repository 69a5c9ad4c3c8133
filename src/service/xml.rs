//! JSON 與 XML 的結構對應
//!
//! JSON -> XML：根元素為 `<root>`，陣列元素以 `<item>` 表示，不輸出型別屬性。
//! XML -> JSON：屬性以 `@` 開頭，混合內容的文字放在 `#text`，
//! 同名的兄弟元素合併為陣列，空元素為 `null`。

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use std::path::Path;
use crate::error::{ConversionError, Result};

pub const ROOT_ELEMENT: &str = "root";
pub const LIST_ITEM_ELEMENT: &str = "item";
const ATTRIBUTE_PREFIX: &str = "@";
const TEXT_KEY: &str = "#text";

/// 將 JSON 值序列化為縮排的 XML 文件（含 XML 宣告與結尾換行）
pub fn json_to_xml(value: &Value) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
    match value {
        Value::Object(map) => write_members(&mut writer, map)?,
        Value::Array(items) => write_items(&mut writer, items)?,
        scalar => write_element(&mut writer, LIST_ITEM_ELEMENT, scalar)?,
    }
    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    xml.push('\n');
    Ok(xml)
}

fn write_members<W: std::io::Write>(writer: &mut Writer<W>, map: &Map<String, Value>) -> Result<()> {
    for (key, value) in map {
        write_element(writer, key, value)?;
    }
    Ok(())
}

fn write_items<W: std::io::Write>(writer: &mut Writer<W>, items: &[Value]) -> Result<()> {
    for item in items {
        write_element(writer, LIST_ITEM_ELEMENT, item)?;
    }
    Ok(())
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, key: &str, value: &Value) -> Result<()> {
    let (name, original) = element_name(key);
    let mut start = BytesStart::new(name.as_str());
    if let Some(original) = original {
        start.push_attribute(("name", original.as_str()));
    }

    match value {
        Value::Null => {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        Value::Object(map) => {
            writer.write_event(Event::Start(start))?;
            write_members(writer, map)?;
        }
        Value::Array(items) => {
            writer.write_event(Event::Start(start))?;
            write_items(writer, items)?;
        }
        Value::String(text) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        Value::Bool(flag) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(if *flag { "true" } else { "false" })))?;
        }
        Value::Number(number) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(&number.to_string())))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

/// 將 JSON 鍵轉為合法的 XML 元素名稱；無法修正時回傳 `key` 並保留原名
pub fn element_name(key: &str) -> (String, Option<String>) {
    if is_valid_xml_name(key) {
        return (key.to_string(), None);
    }
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        return (format!("n{}", key), None);
    }
    let underscored = key.replace(' ', "_");
    if is_valid_xml_name(&underscored) {
        return (underscored, None);
    }
    ("key".to_string(), Some(key.to_string()))
}

pub fn is_valid_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

struct Frame {
    name: String,
    members: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(start: &BytesStart<'_>) -> Result<Frame> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut members = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = format!("{}{}", ATTRIBUTE_PREFIX, String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr.unescape_value()?.into_owned();
            members.insert(key, Value::String(value));
        }
        Ok(Frame { name, members, text: String::new() })
    }

    fn finish(self) -> (String, Value) {
        let text = self.text.trim().to_string();
        let value = if self.members.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text)
            }
        } else {
            let mut members = self.members;
            if !text.is_empty() {
                members.insert(TEXT_KEY.to_string(), Value::String(text));
            }
            Value::Object(members)
        };
        (self.name, value)
    }
}

fn push_member(members: &mut Map<String, Value>, key: String, value: Value) {
    match members.get_mut(&key) {
        Some(Value::Array(existing)) => existing.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            members.insert(key, value);
        }
    }
}

/// 解析 XML 文件為 JSON 值，最外層為 `{根元素名稱: 內容}`
pub fn xml_to_json(xml: &str, source: &Path) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::new(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::new(&start)?.finish();
                attach(&mut stack, &mut root, name, value, source)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| ConversionError::malformed(source, "多餘的結束標籤"))?;
                let (name, value) = frame.finish();
                attach(&mut stack, &mut root, name, value, source)?;
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ConversionError::malformed(source, "XML 元素未正確結束"));
    }
    let (name, value) = root.ok_or_else(|| ConversionError::malformed(source, "找不到根元素"))?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    name: String,
    value: Value,
    source: &Path,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => push_member(&mut parent.members, name, value),
        None if root.is_none() => *root = Some((name, value)),
        None => return Err(ConversionError::malformed(source, "文件包含多個根元素")),
    }
    Ok(())
}
