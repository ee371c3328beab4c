use crate::document::{Misc, NodeId, NodeKind, XmlDocument};
use crate::error::XmlError;
use quick_xml::Writer;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::io::Write;

impl XmlDocument {
    /// Serializes the tree with an XML declaration and a trailing newline.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Streams the serialized tree into `sink`.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<(), XmlError> {
        let mut writer = Writer::new(sink);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.get_mut().write_all(b"\n")?;
        for misc in &self.prolog {
            write_misc(&mut writer, misc)?;
            writer.get_mut().write_all(b"\n")?;
        }
        self.write_node(&mut writer, self.root())?;
        writer.get_mut().write_all(b"\n")?;
        for misc in &self.epilog {
            write_misc(&mut writer, misc)?;
            writer.get_mut().write_all(b"\n")?;
        }
        Ok(())
    }

    fn write_node<W: Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<(), XmlError> {
        match self.kind(id) {
            NodeKind::Text(text) => {
                writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
            }
            NodeKind::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
            NodeKind::Element(element) => {
                let mut start = BytesStart::new(element.name.as_str());
                for (key, value) in &element.attributes {
                    let value = escape_attribute(value);
                    start.push_attribute((key.as_bytes(), value.as_bytes()));
                }

                let children = self.children(id);
                if children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    for child in children {
                        self.write_node(writer, *child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
                }
            }
        }
        Ok(())
    }
}

fn write_misc<W: Write>(writer: &mut Writer<W>, misc: &Misc) -> Result<(), XmlError> {
    let event = match misc {
        Misc::Doctype(text) => Event::DocType(BytesText::from_escaped(text.as_str())),
        Misc::Comment(text) => Event::Comment(BytesText::from_escaped(text.as_str())),
        Misc::Instruction(text) => Event::PI(BytesPI::new(text.as_str())),
    };
    writer.write_event(event)?;
    Ok(())
}

/// Escapes markup characters and `\r`, which a parser would otherwise
/// fold into `\n`.
fn escape_text(text: &str) -> Cow<'_, str> {
    let escaped = partial_escape(text);
    if escaped.contains('\r') {
        Cow::Owned(escaped.replace('\r', "&#13;"))
    } else {
        escaped
    }
}

/// Escapes markup characters, quotes and the whitespace characters that
/// attribute value normalization would turn into spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if escaped.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            escaped
                .replace('\n', "&#10;")
                .replace('\r', "&#13;")
                .replace('\t', "&#9;"),
        )
    } else {
        escaped
    }
}
