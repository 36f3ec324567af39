//! `ssd print`: indented text rendering of a parsed document.
//!
//! One block per top-level node:
//!
//! ```text
//! Node Type: Data
//!   Name: Person
//!   Attribute: table
//!     Parameter: name = people
//!   Property: name : string
//! ```

use ssd_core::{Argument, Ast, Attribute, Entry, Node, NodeKind};

/// Render every node of `ast` in source order.
pub fn render(ast: &Ast) -> String {
    let mut out = String::new();
    let mut node = ast.first();
    while let Some(n) = node {
        render_node(&mut out, n.get());
        node = n.next();
    }
    out
}

/// Append `text` as one line indented by `depth` levels.
fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

fn render_node(out: &mut String, node: &Node) {
    let kind = match node.kind() {
        NodeKind::Import { .. } => "Import",
        NodeKind::Data { .. } => "Data",
        NodeKind::Enum { .. } => "Enum",
        NodeKind::Service { .. } => "Service",
    };
    line(out, 0, &format!("Node Type: {}", kind));
    match node.import_path() {
        Some(path) => line(out, 1, &format!("Path: {}", path)),
        None => line(out, 1, &format!("Name: {}", node.name().unwrap_or_default())),
    }
    render_attributes(out, node.attributes(), 1);

    let mut prop = node.properties();
    while let Some(p) = prop {
        line(out, 1, &format!("Property: {} : {}", p.name(), p.ty()));
        render_attributes(out, p.attributes(), 2);
        prop = p.next();
    }

    let mut variant = node.enum_variants();
    while let Some(v) = variant {
        match v.value() {
            Some(value) => line(out, 1, &format!("Enum Value: {} = {}", v.name(), value)),
            None => line(out, 1, &format!("Enum Value: {}", v.name())),
        }
        render_attributes(out, v.attributes(), 2);
        variant = v.next();
    }

    if let Some(deps) = node.dependencies() {
        for dep in deps.iter() {
            line(out, 1, &format!("Dependency: {}", dep.path()));
            render_attributes(out, dep.attributes(), 2);
        }
    }

    if let Some(handlers) = node.handlers() {
        for handler in handlers.iter() {
            match handler.return_type() {
                Some(ty) => line(out, 1, &format!("Handler: {} -> {}", handler.name(), ty)),
                None => line(out, 1, &format!("Handler: {}", handler.name())),
            }
            render_attributes(out, handler.attributes(), 2);
            render_arguments(out, handler.argument_list());
        }
    }

    if let Some(events) = node.events() {
        for event in events.iter() {
            line(out, 1, &format!("Event: {}", event.name()));
            render_attributes(out, event.attributes(), 2);
            render_arguments(out, event.argument_list());
        }
    }
}

fn render_arguments(out: &mut String, arguments: &[Argument]) {
    for arg in arguments {
        line(out, 2, &format!("Argument: {} : {}", arg.name(), arg.ty()));
        render_attributes(out, arg.attributes(), 3);
    }
}

fn render_attributes(out: &mut String, first: Option<Entry<'_, Attribute>>, depth: usize) {
    let mut attr = first;
    while let Some(a) = attr {
        line(out, depth, &format!("Attribute: {}", a.name()));
        let mut param = a.parameters();
        while let Some(p) = param {
            match p.value() {
                Some(value) => line(out, depth + 1, &format!("Parameter: {} = {}", p.key(), value)),
                None => line(out, depth + 1, &format!("Parameter: {}", p.key())),
            }
            param = p.next();
        }
        attr = a.next();
    }
}
