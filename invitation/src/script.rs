//! Line-oriented input scripts for driving a presentation without a browser.
//!
//! ```text
//! # dismiss the overlay (which also pages forward), then page forward again
//! wait 200
//! click overlay
//! wait 1600
//! swipe -80 0
//! ```

use std::str::FromStr;
use std::time::Duration;

use crate::error::ScriptError;
use crate::input::{ClickTarget, Key, LightboxPart, RawInput};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptStep {
    Input(RawInput),
    Wait(Duration),
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (i, line) in text.lines().enumerate() {
        steps.extend(parse_line(line, i + 1)?);
    }
    Ok(steps)
}

/// Parses one line. Blank lines and `#` comments produce no steps; a swipe
/// produces a touch start and a touch end.
pub fn parse_line(line: &str, line_no: usize) -> Result<Vec<ScriptStep>, ScriptError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Vec::new());
    };
    let args: Vec<&str> = words.collect();
    let err = |message: String| ScriptError::new(line_no, message);

    let input = |raw: RawInput| Ok(vec![ScriptStep::Input(raw)]);
    match (command, args.as_slice()) {
        ("wait", [ms]) => Ok(vec![ScriptStep::Wait(Duration::from_millis(
            number(ms, line_no)?,
        ))]),
        ("key", [name]) => input(RawInput::Key {
            key: key_from_word(name),
        }),
        ("click", words) => input(RawInput::Click {
            target: click_target(words, line_no)?,
        }),
        ("touch", [phase, x, y]) => {
            let (x, y) = (number(x, line_no)?, number(y, line_no)?);
            match *phase {
                "start" => input(RawInput::TouchStart { x, y }),
                "end" => input(RawInput::TouchEnd { x, y }),
                other => Err(err(format!("unknown touch phase {other:?}"))),
            }
        }
        ("swipe", [dx, dy]) => {
            let (dx, dy): (f32, f32) = (number(dx, line_no)?, number(dy, line_no)?);
            Ok(vec![
                ScriptStep::Input(RawInput::TouchStart { x: 0.0, y: 0.0 }),
                ScriptStep::Input(RawInput::TouchEnd { x: dx, y: dy }),
            ])
        }
        (other, _) => Err(err(format!("cannot parse {other:?} with {} argument(s)", args.len()))),
    }
}

fn number<T: FromStr>(word: &str, line_no: usize) -> Result<T, ScriptError> {
    word.parse()
        .map_err(|_| ScriptError::new(line_no, format!("expected a number, got {word:?}")))
}

fn key_from_word(word: &str) -> Key {
    match word {
        "Space" | "space" => Key::Space,
        other => Key::from_dom_name(other),
    }
}

fn click_target(words: &[&str], line_no: usize) -> Result<ClickTarget, ScriptError> {
    let target = match words {
        ["scene"] => ClickTarget::Scene,
        ["overlay"] => ClickTarget::OpeningOverlay,
        ["phone"] => ClickTarget::PhoneLink,
        ["dot", n] => ClickTarget::ProgressDot(number(n, line_no)?),
        ["gallery", n] => ClickTarget::GalleryItem(number(n, line_no)?),
        ["event", n] => ClickTarget::EventItem(number(n, line_no)?),
        ["lightbox", part] => ClickTarget::Lightbox(match *part {
            "backdrop" => LightboxPart::Backdrop,
            "content" => LightboxPart::Content,
            "close" => LightboxPart::Close,
            "prev" => LightboxPart::Prev,
            "next" => LightboxPart::Next,
            other => {
                return Err(ScriptError::new(
                    line_no,
                    format!("unknown lightbox part {other:?}"),
                ));
            }
        }),
        other => {
            return Err(ScriptError::new(
                line_no,
                format!("unknown click target {:?}", other.join(" ")),
            ));
        }
    };
    Ok(target)
}
