use super::Parser;
use crate::ast::{EnumVariant, NodeKind, Property};
use crate::error::ParseError;
use tracing::trace;

impl<'c, 'a> Parser<'c, 'a> {
    pub(super) fn parse_import(&mut self) -> Result<NodeKind, ParseError> {
        let path = self.expect_path("import", "Expected import path")?;
        Ok(NodeKind::Import { path })
    }

    // -- data ---------------------------------------------------

    pub(super) fn parse_data(&mut self) -> Result<NodeKind, ParseError> {
        let name = self.expect_name("data", "Expected data name")?;
        let properties = self.parse_properties()?;
        Ok(NodeKind::Data { name, properties })
    }

    fn parse_properties(&mut self) -> Result<Vec<Property>, ParseError> {
        self.expect('{', "Expected '{' after data name")?;
        let mut properties = Vec::new();
        self.cur.skip_whitespace_and_comments();
        while self.cur.current() != '}' {
            let attributes = self.parse_attributes("property")?;
            let name = self.cur.scan_identifier("property")?;
            self.expect(':', "Expected ':' after property name")?;
            let ty = self.parse_type("property type")?;
            trace!(%name, %ty, "property");
            properties.push(Property::new(attributes, name, ty));

            self.cur.skip_whitespace_and_comments();
            if !self.cur.eat(',') {
                break;
            }
            self.cur.skip_whitespace_and_comments();
        }
        self.close_body(
            properties.is_empty(),
            "Expected ',' or '}' after property",
            "Data must have at least one property",
        )?;
        Ok(properties)
    }

    // -- enum ---------------------------------------------------

    pub(super) fn parse_enum(&mut self) -> Result<NodeKind, ParseError> {
        let name = self.expect_name("enum", "Expected enum name")?;
        let variants = self.parse_enum_variants()?;
        Ok(NodeKind::Enum { name, variants })
    }

    fn parse_enum_variants(&mut self) -> Result<Vec<EnumVariant>, ParseError> {
        self.expect('{', "Expected '{' after enum name")?;
        let mut variants = Vec::new();
        self.cur.skip_whitespace_and_comments();
        while self.cur.current() != '}' {
            let attributes = self.parse_attributes("enum variant")?;
            let name = self.cur.scan_identifier("enum variant")?;
            self.cur.skip_whitespace_and_comments();
            let value = if self.cur.eat('=') {
                Some(self.cur.scan_integer("enum variant")?)
            } else {
                None
            };
            trace!(%name, ?value, "enum variant");
            variants.push(EnumVariant::new(attributes, name, value));

            self.cur.skip_whitespace_and_comments();
            if !self.cur.eat(',') {
                break;
            }
            self.cur.skip_whitespace_and_comments();
        }
        self.close_body(
            variants.is_empty(),
            "Expected ',' or '}' after enum variant",
            "Enum must have at least one variant",
        )?;
        Ok(variants)
    }

    /// Consume the `}` ending a body. An empty body is rejected while the
    /// cursor still sits on the brace.
    pub(super) fn close_body(
        &mut self,
        empty: bool,
        unclosed: &str,
        empty_message: &str,
    ) -> Result<(), ParseError> {
        self.cur.skip_whitespace_and_comments();
        if self.cur.current() != '}' {
            return Err(self.cur.error(unclosed));
        }
        if empty {
            return Err(self.cur.error(empty_message));
        }
        self.cur.advance();
        Ok(())
    }
}
