use super::Parser;
use crate::ast::{Argument, Attribute, Dependency, Event, Handler, NodeKind};
use crate::error::ParseError;
use tracing::trace;

impl<'c, 'a> Parser<'c, 'a> {
    // -- Service parsing ----------------------------------------

    /// `service Name { component; ... }` where each component is a
    /// dependency, a handler or an event. Each kind keeps its own order.
    pub(super) fn parse_service(&mut self) -> Result<NodeKind, ParseError> {
        let name = self.expect_name("service", "Expected service name")?;
        self.expect('{', "Expected '{' after service name")?;

        let mut dependencies = Vec::new();
        let mut handlers = Vec::new();
        let mut events = Vec::new();

        self.cur.skip_whitespace_and_comments();
        while self.cur.current() != '}' {
            let attributes = self.parse_attributes("service component")?;
            let start = self.cur.save();
            let keyword = if self.cur.at_identifier() {
                self.cur.scan_identifier("service component")?
            } else {
                String::new()
            };
            match keyword.as_str() {
                "depends" => dependencies.push(self.parse_dependency(attributes)?),
                "fn" => handlers.push(self.parse_handler(attributes)?),
                "event" => events.push(self.parse_event(attributes)?),
                _ => {
                    return Err(self
                        .cur
                        .error_at(start, "Expected 'depends', 'fn' or 'event' keyword"))
                }
            }
            self.expect(';', "Expected ';' after service component")?;
            self.cur.skip_whitespace_and_comments();
        }
        self.close_body(
            handlers.is_empty() && events.is_empty(),
            "Expected '}' after service body",
            "Service must have at least one handler or event",
        )?;

        Ok(NodeKind::Service {
            name,
            dependencies,
            handlers,
            events,
        })
    }

    fn parse_dependency(&mut self, attributes: Vec<Attribute>) -> Result<Dependency, ParseError> {
        self.expect_keyword("on", "dependency", "Expected 'on' after 'depends'")?;
        let path = self.expect_path("dependency", "Expected dependency path")?;
        trace!(%path, "dependency");
        Ok(Dependency::new(attributes, path))
    }

    fn parse_handler(&mut self, attributes: Vec<Attribute>) -> Result<Handler, ParseError> {
        let name = self.expect_name("handler", "Expected handler name")?;
        self.expect('(', "Expected '(' after handler name")?;
        let arguments = self.parse_arguments("handler argument")?;
        self.expect(')', "Expected ')' after handler arguments")?;

        self.cur.skip_whitespace_and_comments();
        let return_type = if self.cur.current() == '-' && self.cur.peek() == '>' {
            self.cur.advance();
            self.cur.advance();
            Some(self.parse_type("return type")?)
        } else {
            None
        };
        trace!(%name, arguments = arguments.len(), returns = return_type.is_some(), "handler");
        Ok(Handler::new(attributes, name, arguments, return_type))
    }

    fn parse_event(&mut self, attributes: Vec<Attribute>) -> Result<Event, ParseError> {
        let name = self.expect_name("event", "Expected event name")?;
        self.expect('(', "Expected '(' after event name")?;
        let arguments = self.parse_arguments("event argument")?;
        self.expect(')', "Expected ')' after event arguments")?;
        trace!(%name, arguments = arguments.len(), "event");
        Ok(Event::new(attributes, name, arguments))
    }

    /// Comma-separated `name: type` list up to (not including) `)`.
    /// May be empty.
    fn parse_arguments(&mut self, context: &str) -> Result<Vec<Argument>, ParseError> {
        let mut arguments = Vec::new();
        self.cur.skip_whitespace_and_comments();
        while self.cur.current() != ')' {
            let attributes = self.parse_attributes(context)?;
            let name = self.expect_name(context, "Expected argument name")?;
            self.expect(':', "Expected ':' after argument name")?;
            let ty = self.parse_type("argument type")?;
            arguments.push(Argument::new(attributes, name, ty));

            self.cur.skip_whitespace_and_comments();
            if !self.cur.eat(',') {
                break;
            }
            self.cur.skip_whitespace_and_comments();
        }
        Ok(arguments)
    }
}
