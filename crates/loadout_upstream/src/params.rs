//! Query parameter enums for the pass-through endpoints.

/// Encoding of the AES keys returned by `/v2/aes`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum AesKeyFormat {
    /// Hexadecimal keys
    #[default]
    Hex,
    /// Base64 keys
    Base64,
}

/// Platform an account name belongs to, for stats lookups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum AccountType {
    /// Epic Games account
    #[default]
    Epic,
    /// PlayStation Network
    Psn,
    /// Xbox Live
    Xbl,
}
