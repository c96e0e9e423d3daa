//! Plain-text screenplay export.

use super::element::{ElementKind, ScriptElement};
use super::markup::parse_markup;
use crate::project::ProjectSnapshot;

/// File name offered for plain-text script exports.
pub const EXPORT_TEXT_FILE_NAME: &str = "script.txt";

const CHARACTER_INDENT: usize = 30;
const DIALOGUE_INDENT: usize = 15;
const PARENTHETICAL_INDENT: usize = 22;
const TRANSITION_INDENT: usize = 50;

/// Lays out the snapshot's script body as a fixed-indentation screenplay.
pub fn export_plain_text(snapshot: &ProjectSnapshot) -> String {
    elements_to_plain_text(&parse_markup(&snapshot.script_content))
}

pub fn elements_to_plain_text(elements: &[ScriptElement]) -> String {
    let mut out = String::new();
    for element in elements {
        let line = element.text.trim();
        if line.is_empty() {
            out.push('\n');
            continue;
        }

        match element.kind() {
            Some(ElementKind::SceneHeading) => {
                out.push_str(&line.to_uppercase());
                out.push_str("\n\n");
            }
            Some(ElementKind::Action) => {
                out.push_str(line);
                out.push_str("\n\n");
            }
            Some(ElementKind::Character) => {
                push_indented(&mut out, CHARACTER_INDENT, &line.to_uppercase());
                out.push('\n');
            }
            Some(ElementKind::Dialogue) => {
                push_indented(&mut out, DIALOGUE_INDENT, line);
                out.push_str("\n\n");
            }
            Some(ElementKind::Parenthetical) => {
                push_indented(&mut out, PARENTHETICAL_INDENT, &format!("({line})"));
                out.push('\n');
            }
            Some(ElementKind::Transition) => {
                push_indented(&mut out, TRANSITION_INDENT, &line.to_uppercase());
                out.push_str("\n\n");
            }
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

fn push_indented(out: &mut String, indent: usize, text: &str) {
    out.extend(std::iter::repeat(' ').take(indent));
    out.push_str(text);
}
