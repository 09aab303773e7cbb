//! The fixed set of recognizable sign symbols.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of symbols in the label set.
pub const LABEL_COUNT: usize = 35;

/// One recognizable sign: digits `1`-`9` followed by letters `A`-`Z`.
///
/// Declaration order is the classifier's output order, so `Ord` follows the
/// positions of the probability distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "G")]
    G,
    #[serde(rename = "H")]
    H,
    #[serde(rename = "I")]
    I,
    #[serde(rename = "J")]
    J,
    #[serde(rename = "K")]
    K,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "N")]
    N,
    #[serde(rename = "O")]
    O,
    #[serde(rename = "P")]
    P,
    #[serde(rename = "Q")]
    Q,
    #[serde(rename = "R")]
    R,
    #[serde(rename = "S")]
    S,
    #[serde(rename = "T")]
    T,
    #[serde(rename = "U")]
    U,
    #[serde(rename = "V")]
    V,
    #[serde(rename = "W")]
    W,
    #[serde(rename = "X")]
    X,
    #[serde(rename = "Y")]
    Y,
    #[serde(rename = "Z")]
    Z,
}

impl Label {
    /// All labels, positionally aligned with classifier output.
    pub const ALL: [Label; LABEL_COUNT] = {
        use Label::*;
        [
            One,
            Two,
            Three,
            Four,
            Five,
            Six,
            Seven,
            Eight,
            Nine,
            A,
            B,
            C,
            D,
            E,
            F,
            G,
            H,
            I,
            J,
            K,
            L,
            M,
            N,
            O,
            P,
            Q,
            R,
            S,
            T,
            U,
            V,
            W,
            X,
            Y,
            Z,
        ]
    };

    /// Label at a distribution index, `None` past the end of the set.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        use Label::*;
        match self {
            One => "1",
            Two => "2",
            Three => "3",
            Four => "4",
            Five => "5",
            Six => "6",
            Seven => "7",
            Eight => "8",
            Nine => "9",
            A => "A",
            B => "B",
            C => "C",
            D => "D",
            E => "E",
            F => "F",
            G => "G",
            H => "H",
            I => "I",
            J => "J",
            K => "K",
            L => "L",
            M => "M",
            N => "N",
            O => "O",
            P => "P",
            Q => "Q",
            R => "R",
            S => "S",
            T => "T",
            U => "U",
            V => "V",
            W => "W",
            X => "X",
            Y => "Y",
            Z => "Z",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sign label {0:?}")]
pub struct ParseLabelError(pub String);

impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLabelError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_set_is_digits_then_letters() {
        let symbols: String = Label::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(symbols, "123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        for (i, label) in Label::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(Label::from_index(i), Some(*label));
        }
        assert_eq!(Label::from_index(LABEL_COUNT), None);
    }

    #[test]
    fn order_follows_distribution_positions() {
        assert!(Label::One < Label::Nine);
        assert!(Label::Nine < Label::A);
        assert!(Label::A < Label::Z);
        assert_eq!(Label::from_index(30), Some(Label::V));
    }

    #[test]
    fn parses_symbols_case_insensitively() {
        assert_eq!("7".parse::<Label>(), Ok(Label::Seven));
        assert_eq!("q".parse::<Label>(), Ok(Label::Q));
        assert!("0".parse::<Label>().is_err());
        assert!("AB".parse::<Label>().is_err());
    }

    #[test]
    fn serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Label::Three).expect("json"), "\"3\"");
        let back: Label = serde_json::from_str("\"K\"").expect("label");
        assert_eq!(back, Label::K);
    }
}
