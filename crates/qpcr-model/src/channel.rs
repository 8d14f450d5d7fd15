//! Channel selection by one-based index.
//!
//! Front ends address channels with a one-based index where `0` means all
//! channels and any negative value means none.

use crate::error::{ModelError, Result};

/// Prefix of one-based channel labels (`Channel_1`, `Channel_2`, ...).
pub const CHANNEL_LABEL_PREFIX: &str = "Channel_";

/// Decoded one-based channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelector {
    None,
    All,
    /// Zero-based channel position.
    Channel(usize),
}

impl ChannelSelector {
    pub fn from_1index(idx1: i64) -> Self {
        match usize::try_from(idx1) {
            Err(_) => Self::None,
            Ok(0) => Self::All,
            Ok(idx) => Self::Channel(idx - 1),
        }
    }
}

/// Display label for a one-based channel index: `None`, `All` or `Channel_<n>`.
pub fn channel_label_for_1index(idx1: i64) -> String {
    match ChannelSelector::from_1index(idx1) {
        ChannelSelector::None => "None".to_string(),
        ChannelSelector::All => "All".to_string(),
        ChannelSelector::Channel(idx) => format!("{CHANNEL_LABEL_PREFIX}{}", idx + 1),
    }
}

/// Zero-based channel index from a one-based label; `"Channel_1"` gives `0`.
pub fn channel_index_from_label(label: &str) -> Result<usize> {
    label
        .strip_prefix(CHANNEL_LABEL_PREFIX)
        .and_then(|digits| digits.parse::<usize>().ok())
        .and_then(|idx1| idx1.checked_sub(1))
        .ok_or_else(|| ModelError::MalformedChannelLabel {
            label: label.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_sentinels() {
        assert_eq!(channel_label_for_1index(-1), "None");
        assert_eq!(channel_label_for_1index(0), "All");
        assert_eq!(channel_label_for_1index(2), "Channel_2");
    }

    #[test]
    fn parses_labels() {
        assert_eq!(channel_index_from_label("Channel_1").unwrap(), 0);
        assert_eq!(channel_index_from_label("Channel_4").unwrap(), 3);
        assert!(channel_index_from_label("Channel_0").is_err());
        assert!(channel_index_from_label("All").is_err());
    }

    #[test]
    fn selector_from_index() {
        assert_eq!(ChannelSelector::from_1index(-5), ChannelSelector::None);
        assert_eq!(ChannelSelector::from_1index(0), ChannelSelector::All);
        assert_eq!(ChannelSelector::from_1index(1), ChannelSelector::Channel(0));
    }
}
