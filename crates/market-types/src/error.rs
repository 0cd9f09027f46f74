/// Failure to turn a user-entered price into a token amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    Empty,
    InvalidCharacter(char),
    Negative,
    /// More significant fractional digits than the currency carries.
    TooPrecise { decimals: u8 },
    Overflow,
}

impl std::fmt::Display for AmountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "amount is empty"),
            Self::InvalidCharacter(c) => write!(f, "invalid character '{c}' in amount"),
            Self::Negative => write!(f, "amount cannot be negative"),
            Self::TooPrecise { decimals } => {
                write!(f, "amount has more than {decimals} fractional digits")
            }
            Self::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for AmountError {}
