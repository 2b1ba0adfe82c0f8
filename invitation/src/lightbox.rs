use serde::{Deserialize, Serialize};

use crate::cursor::{self, EdgePolicy};
use crate::input::{Key, LightboxPart};

/// Read-only access to the gallery's per-item content.
pub trait GalleryProvider {
    fn len(&self) -> usize;

    fn caption(&self, index: usize) -> Option<&str>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GalleryProvider for Vec<String> {
    fn len(&self) -> usize {
        <[String]>::len(self)
    }

    fn caption(&self, index: usize) -> Option<&str> {
        self.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightboxEffect {
    Show { index: usize },
    Closed,
}

/// Modal photo viewer over `len` gallery items.
///
/// The viewed index only exists while the lightbox is open: every `open`
/// names the item to show, and closing forgets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lightbox {
    len: usize,
    viewing: Option<usize>,
}

impl Lightbox {
    pub fn new(len: usize) -> Self {
        Self { len, viewing: None }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_open(&self) -> bool {
        self.viewing.is_some()
    }

    pub fn current(&self) -> Option<usize> {
        self.viewing
    }

    pub fn open(&mut self, index: usize) -> Option<LightboxEffect> {
        if index >= self.len {
            tracing::debug!(index, len = self.len, "lightbox open ignored: no such item");
            return None;
        }
        self.viewing = Some(index);
        Some(LightboxEffect::Show { index })
    }

    pub fn close(&mut self) -> Option<LightboxEffect> {
        self.viewing.take().map(|_| LightboxEffect::Closed)
    }

    /// Steps to the neighbouring item, wrapping at both ends.
    pub fn navigate(&mut self, direction: isize) -> Option<LightboxEffect> {
        let current = self.viewing?;
        let index = cursor::step(current, self.len, direction, EdgePolicy::Wrap)?;
        self.viewing = Some(index);
        Some(LightboxEffect::Show { index })
    }

    /// Modal key handling. Returns `None` when closed or for keys it does not own.
    pub fn handle_key(&mut self, key: Key) -> Option<LightboxEffect> {
        if !self.is_open() {
            return None;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.navigate(-1),
            Key::ArrowRight => self.navigate(1),
            _ => None,
        }
    }

    pub fn handle_click(&mut self, part: LightboxPart) -> Option<LightboxEffect> {
        match part {
            LightboxPart::Backdrop | LightboxPart::Close => self.close(),
            LightboxPart::Prev => self.navigate(-1),
            LightboxPart::Next => self.navigate(1),
            LightboxPart::Content => None,
        }
    }
}
