use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use crate::error::Result;
use crate::models::conversion::ConversionRequest;
use crate::service::xml::{json_to_xml, xml_to_json};
use crate::strategy::traits::i_strategy::ConversionStrategy;

const JSON_INDENT: &[u8] = b"    ";

pub struct JsonToXmlStrategy;

impl ConversionStrategy for JsonToXmlStrategy {
    fn name(&self) -> &'static str {
        "JsonToXml"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let value: Value = serde_json::from_reader(BufReader::new(File::open(source)?))?;
        fs::write(&request.target, json_to_xml(&value)?)?;
        Ok(())
    }
}

pub struct XmlToJsonStrategy;

impl ConversionStrategy for XmlToJsonStrategy {
    fn name(&self) -> &'static str {
        "XmlToJson"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let xml = fs::read_to_string(source)?;
        let value = xml_to_json(&xml, source)?;

        let mut writer = BufWriter::new(File::create(&request.target)?);
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(JSON_INDENT));
        value.serialize(&mut serializer)?;
        writer.flush()?;
        Ok(())
    }
}
