//! Field extraction from parsed panel pages
//!
//! The panel has no API, and its markup has no stable id/for links between
//! captions and inputs. Everything here navigates the tree structurally, so
//! the offsets below are facts about the observed layout. When the panel
//! markup moves, these constants are what needs to change.

use crate::dom::{ancestor, attr, find_element, first_text, ParsedPage};
use crate::models::CheckboxState;
use scraper::ElementRef;

/// Class carried by caption spans in the config editor.
///
/// Matched as one token of the class list, not as the whole attribute, so
/// captions the panel decorates with extra classes (`Label Required`) are
/// still found.
const LABEL_CLASS: &str = "Label";

/// The config editor renders each setting as
///
/// ```text
/// div.FormRow                      <- 3
///   div.Caption                    <- 2
///     label[for]                   <- 1
///       span.Label "Server Name"   <- caption
///   div.Field
///     input[value]
/// ```
///
/// so the input lives somewhere below the caption's third ancestor.
const LABEL_INPUT_SCOPE_DEPTH: usize = 3;

/// Class marker of the box showing the selected service command line
const COMMAND_LINE_MARKER: &str = "SelectedCommandLine";

/// The command line box holds a title, a `<br>`, then the command line
/// itself, which is therefore its third child node.
const COMMAND_LINE_TEXT_CHILD: usize = 2;

const PASSWORD_ARGUMENT: &str = "ServerPassword=";

/// Value of the input associated with the caption containing `label`.
///
/// Soft-fails: any broken step yields an empty string.
pub fn value_by_label(page: &ParsedPage, label: &str) -> String {
    let caption = page.find(|el| {
        el.value().classes().any(|c| c == LABEL_CLASS)
            && first_text(*el).is_some_and(|text| text.contains(label))
    });
    let Some(caption) = caption else {
        return String::new();
    };

    let linked = caption
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| attr(&parent, "for").is_some());
    if !linked {
        return String::new();
    }

    ancestor(caption, LABEL_INPUT_SCOPE_DEPTH)
        .and_then(|scope| find_element(scope, |el| el.value().name() == "input"))
        .and_then(|input| attr(&input, "value"))
        .unwrap_or_default()
        .to_string()
}

/// Value attribute of the element named exactly `name`.
///
/// `None` when the element is missing or has no value attribute; callers use
/// that to detect layout drift, so it is kept apart from `Some("")`.
pub fn value_by_name(page: &ParsedPage, name: &str) -> Option<String> {
    by_name(page, name)
        .and_then(|el| attr(&el, "value"))
        .map(str::to_string)
}

/// `On` iff the element named `name` exists and carries `checked`
pub fn checked_state(page: &ParsedPage, name: &str) -> CheckboxState {
    match by_name(page, name) {
        Some(el) if attr(&el, "checked").is_some() => CheckboxState::On,
        _ => CheckboxState::Off,
    }
}

/// Password passed to the game server on its command line, or empty
pub fn command_line_password(page: &ParsedPage) -> String {
    let display =
        page.find(|el| attr(el, "class").is_some_and(|c| c.contains(COMMAND_LINE_MARKER)));
    let Some(child) = display.and_then(|el| el.children().nth(COMMAND_LINE_TEXT_CHILD)) else {
        return String::new();
    };

    let line: String = match ElementRef::wrap(child) {
        Some(el) => el.text().collect(),
        None => child
            .value()
            .as_text()
            .map(|text| (**text).to_owned())
            .unwrap_or_default(),
    };
    password_argument(&line)
}

/// Splits on `-` and takes the first `ServerPassword=` argument.
///
/// A password that itself contains `-` is cut at the dash.
pub fn password_argument(line: &str) -> String {
    line.split('-')
        .find_map(|arg| arg.trim_start().strip_prefix(PASSWORD_ARGUMENT))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn by_name<'a>(page: &'a ParsedPage, name: &str) -> Option<ElementRef<'a>> {
    page.find(|el| attr(el, "name") == Some(name))
}
