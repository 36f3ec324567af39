use super::Parser;
use crate::ast::{Attribute, AttributeParameter};
use crate::error::ParseError;
use tracing::trace;

impl<'c, 'a> Parser<'c, 'a> {
    // -- Attribute parsing --------------------------------------

    /// Zero or more `#[name(key = "value", flag), other]` groups, flattened
    /// into one list in source order.
    pub(super) fn parse_attributes(
        &mut self,
        context: &str,
    ) -> Result<Vec<Attribute>, ParseError> {
        let mut attributes = Vec::new();
        self.cur.skip_whitespace_and_comments();
        while self.cur.eat('#') {
            self.cur.skip_whitespace_and_comments();
            if !self.cur.eat('[') {
                let msg = self.cur.in_context("Expected '[' after '#'", context);
                return Err(self.cur.error(msg));
            }
            self.cur.skip_whitespace_and_comments();
            while self.cur.current() != ']' {
                let name = self.cur.scan_path("attributes")?;
                let parameters = self.parse_attribute_parameters()?;
                attributes.push(Attribute::new(name, parameters));
                self.cur.skip_whitespace_and_comments();
                if !self.cur.eat(',') {
                    break;
                }
                self.cur.skip_whitespace_and_comments();
            }
            self.expect(']', "Expected ',' or ']' after attribute")?;
            self.cur.skip_whitespace_and_comments();
        }
        if !attributes.is_empty() {
            trace!(count = attributes.len(), context, "attributes");
        }
        Ok(attributes)
    }

    fn parse_attribute_parameters(&mut self) -> Result<Vec<AttributeParameter>, ParseError> {
        let mut parameters = Vec::new();
        self.cur.skip_whitespace_and_comments();
        if !self.cur.eat('(') {
            return Ok(parameters);
        }
        self.cur.skip_whitespace_and_comments();
        while self.cur.current() != ')' {
            let key = self.cur.scan_identifier("attribute arguments")?;
            self.cur.skip_whitespace_and_comments();
            let value = if self.cur.eat('=') {
                Some(self.cur.scan_string("attribute arguments")?)
            } else {
                None
            };
            parameters.push(AttributeParameter::new(key, value));
            self.cur.skip_whitespace_and_comments();
            if !self.cur.eat(',') {
                break;
            }
            self.cur.skip_whitespace_and_comments();
        }
        self.expect(')', "Expected ',' or ')' after attribute parameter")?;
        Ok(parameters)
    }
}
