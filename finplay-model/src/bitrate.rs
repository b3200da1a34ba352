/// Target bitrate for a stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "mode", content = "bits_per_second", rename_all = "snake_case")
)]
pub enum Bitrate {
    /// No cap, the server may direct stream.
    #[default]
    Full,
    /// Ceiling in bits per second.
    Limited(u64),
}

impl Bitrate {
    pub fn cap_bits(self) -> Option<u64> {
        match self {
            Bitrate::Full => None,
            Bitrate::Limited(bits) => Some(bits),
        }
    }

    /// Profiles store the cap as an optional number; zero means no cap.
    pub fn from_cap(cap_bits: Option<u64>) -> Self {
        match cap_bits {
            Some(bits) if bits > 0 => Bitrate::Limited(bits),
            _ => Bitrate::Full,
        }
    }
}

impl std::fmt::Display for Bitrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bitrate::Full => write!(f, "Full"),
            Bitrate::Limited(bits) if *bits >= 1_000_000 => {
                write!(f, "{:.1} Mbps", *bits as f64 / 1_000_000.0)
            }
            Bitrate::Limited(bits) => write!(f, "{} kbps", bits / 1_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_conversion() {
        assert_eq!(Bitrate::from_cap(None), Bitrate::Full);
        assert_eq!(Bitrate::from_cap(Some(0)), Bitrate::Full);
        assert_eq!(
            Bitrate::from_cap(Some(8_000_000)),
            Bitrate::Limited(8_000_000)
        );
        assert_eq!(Bitrate::Limited(720_000).cap_bits(), Some(720_000));
        assert_eq!(Bitrate::Full.cap_bits(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Bitrate::Full.to_string(), "Full");
        assert_eq!(Bitrate::Limited(8_000_000).to_string(), "8.0 Mbps");
        assert_eq!(Bitrate::Limited(720_000).to_string(), "720 kbps");
    }
}
