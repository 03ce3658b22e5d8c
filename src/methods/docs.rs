//! Human-readable documentation for a method descriptor.

use crate::error::Result;
use crate::methods::{MethodDescriptor, MethodTable, Permission};

const WIDTH: usize = 80;
const BREAK: &str = "<br/>";

/// Renders the documentation block for `name`.
///
/// Arguments listed in `ignore_arguments` are left out; the error catalog is
/// appended when `show_errors` is set.
pub fn describe(
    table: &MethodTable,
    name: &str,
    ignore_arguments: &[&str],
    show_errors: bool,
) -> Result<String> {
    let method = table.require(name)?;
    Ok(render(name, method, ignore_arguments, show_errors))
}

fn render(
    name: &str,
    method: &MethodDescriptor,
    ignore_arguments: &[&str],
    show_errors: bool,
) -> String {
    let mut doc = String::new();
    doc.push_str(&format!("flickr method: {}\n\n", name));

    doc.push_str("Description:\n");
    doc.push_str(&format_block(&method.description, WIDTH, &" ".repeat(4)));

    doc.push_str("\nAuthentication:\n    ");
    doc.push_str(authentication(method));
    doc.push('\n');

    doc.push_str("\nArguments:\n");
    for argument in &method.arguments {
        if ignore_arguments.contains(&argument.name.as_str()) {
            continue;
        }
        let kind = if argument.optional { "optional" } else { "required" };
        doc.push_str(&format!("    {} ({}):\n", argument.name, kind));
        doc.push_str(&format_block(&argument.text, WIDTH, &" ".repeat(8)));
    }

    if show_errors && !method.errors.is_empty() {
        doc.push_str("\nErrors:\n");
        for error in &method.errors {
            doc.push_str(&format!("    code {}:\n", error.code));
            doc.push_str(&format_block(&error.message, WIDTH, &" ".repeat(8)));
        }
    }
    doc
}

fn authentication(method: &MethodDescriptor) -> &'static str {
    if !method.needslogin {
        return "This method does not require authentication";
    }
    match method.requiredperms {
        Permission::None => "This method requires authentication",
        Permission::Read => "This method requires authentication with 'read' permission",
        Permission::Write => "This method requires authentication with 'write' permission",
        Permission::Delete => "This method requires authentication with 'delete' permission",
    }
}

// == Format Block ==
/// Wraps Flickr's lightly marked-up text at `width` columns, each line
/// starting with `prefix`.
///
/// `<br/>` forces a line break, list items become `* ` lines, `<strong>` is
/// dropped and `<code>` becomes single quotes. A word longer than the line
/// is kept whole.
pub fn format_block(text: &str, width: usize, prefix: &str) -> String {
    let cleaned = text
        .replace("<br />", BREAK)
        .replace(BREAK, &format!(" {} ", BREAK))
        .replace("<li>", &format!(" {} * ", BREAK))
        .replace("</li>", "")
        .replace("<ul>", &format!(" {} ", BREAK))
        .replace("</ul>", &format!(" {} ", BREAK))
        .replace("<strong>", "")
        .replace("</strong>", "")
        .replace("<code>", "'")
        .replace("</code>", "'")
        .replace("&mdash;", "--");

    let mut lines: Vec<String> = Vec::new();
    let mut line = String::from(prefix);
    let mut empty = true;

    for word in cleaned.split_whitespace() {
        if word == BREAK {
            if !empty {
                lines.push(std::mem::replace(&mut line, String::from(prefix)));
                empty = true;
            }
            continue;
        }
        if !empty && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::replace(&mut line, String::from(prefix)));
            empty = true;
        }
        if !empty {
            line.push(' ');
        }
        line.push_str(word);
        empty = false;
    }
    if !empty {
        lines.push(line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
