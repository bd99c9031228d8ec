use crate::error::{IconError, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Largest frame an ICO container can describe.
pub const MAX_ICON_SIZE: u32 = 256;

/// Sizes written when generating a complete icon from a PNG.
pub const FULL_GENERATION_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Sizes embedded in a web `favicon.ico`.
pub const FAVICON_ICO_SIZES: [u32; 3] = [16, 32, 48];

/// An ordered, non-empty set of square icon sizes in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconSizes(BTreeSet<u32>);

impl IconSizes {
    /// Build a size set, rejecting empty input and sizes outside `1..=256`.
    pub fn new(sizes: impl IntoIterator<Item = u32>) -> Result<Self> {
        let sizes = sizes
            .into_iter()
            .map(|size| {
                if size == 0 || size > MAX_ICON_SIZE {
                    Err(IconError::invalid_size(
                        size.to_string(),
                        format!("must be between 1 and {MAX_ICON_SIZE}"),
                    ))
                } else {
                    Ok(size)
                }
            })
            .collect::<Result<BTreeSet<_>>>()?;

        if sizes.is_empty() {
            return Err(IconError::invalid_size(
                "",
                "select at least one icon size",
            ));
        }
        Ok(Self(sizes))
    }

    /// The full generation set: 16, 32, 48, 64, 128 and 256 px.
    pub fn full() -> Self {
        Self(FULL_GENERATION_SIZES.into_iter().collect())
    }

    /// The favicon set: 16, 32 and 48 px.
    pub fn favicon() -> Self {
        Self(FAVICON_ICO_SIZES.into_iter().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn as_set(&self) -> &BTreeSet<u32> {
        &self.0
    }
}

impl Default for IconSizes {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for IconSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes = self
            .0
            .iter()
            .map(|size| format!("{size}px"))
            .collect::<Vec<_>>();
        write!(f, "{}", sizes.join(", "))
    }
}

/// Parses `"16,32,48"`. Entries may also be written as `16x16`.
impl FromStr for IconSizes {
    type Err = IconError;

    fn from_str(input: &str) -> Result<Self> {
        let sizes = input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_size)
            .collect::<Result<Vec<_>>>()?;
        Self::new(sizes)
    }
}

fn parse_size(part: &str) -> Result<u32> {
    let (width, height) = match part.split_once(['x', 'X']) {
        Some((width, height)) => (width.trim(), height.trim()),
        None => (part, part),
    };
    if width != height {
        return Err(IconError::invalid_size(part, "icon frames must be square"));
    }
    width
        .parse::<u32>()
        .map_err(|e| IconError::invalid_size(part, e.to_string()))
}
