//! Tcl list splitting and quoting

use crate::{Error, Result};

/// Split a Tcl list into its elements.
///
/// Elements are separated by any whitespace. Braced elements are taken
/// literally, quoted elements have their backslash escapes resolved, and no
/// variable or command substitution takes place.
pub fn split_list(list: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = list.chars().collect();
    let mut elements = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        if pos >= chars.len() {
            break;
        }

        let mut element = String::new();
        match chars[pos] {
            '{' => {
                let mut depth = 1usize;
                pos += 1;
                loop {
                    let c = *chars.get(pos).ok_or(Error::Unterminated {
                        line: 1,
                        what: "brace",
                    })?;
                    pos += 1;
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    element.push(c);
                }
                if pos < chars.len() && !chars[pos].is_whitespace() {
                    return Err(Error::ExtraCharacters {
                        line: 1,
                        what: "brace",
                    });
                }
            }
            '"' => {
                pos += 1;
                loop {
                    let c = *chars.get(pos).ok_or(Error::Unterminated {
                        line: 1,
                        what: "quote",
                    })?;
                    pos += 1;
                    match c {
                        '"' => break,
                        '\\' => {
                            if let Some(&next) = chars.get(pos) {
                                element.push(unescape(next));
                                pos += 1;
                            }
                        }
                        _ => element.push(c),
                    }
                }
                if pos < chars.len() && !chars[pos].is_whitespace() {
                    return Err(Error::ExtraCharacters {
                        line: 1,
                        what: "quote",
                    });
                }
            }
            _ => {
                while pos < chars.len() && !chars[pos].is_whitespace() {
                    if chars[pos] == '\\' && pos + 1 < chars.len() {
                        element.push(unescape(chars[pos + 1]));
                        pos += 2;
                    } else {
                        element.push(chars[pos]);
                        pos += 1;
                    }
                }
            }
        }
        elements.push(element);
    }

    Ok(elements)
}

/// Quote one element so that [`split_list`] yields it back unchanged.
pub(crate) fn quote_element(element: &str) -> String {
    let needs_braces = element.is_empty()
        || element
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '"' | '$' | '[' | ']' | '\\' | ';'));
    if needs_braces {
        format!("{{{element}}}")
    } else {
        element.to_string()
    }
}

pub(crate) fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}
