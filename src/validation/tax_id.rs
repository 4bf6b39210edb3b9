//! Brazilian taxpayer identifier validation.
//!
//! Individuals are identified by an 11-digit CPF and companies by a 14-digit
//! CNPJ. Both end in two check digits computed from the preceding digits with
//! a modulo-11 weighted sum. Input may carry the usual punctuation
//! (`111.444.777-35`, `11.222.333/0001-81`); everything that is not an ASCII
//! digit is discarded before validation.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub const CPF_LEN: usize = 11;
pub const CNPJ_LEN: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxIdKind {
    Cpf,
    Cnpj,
}

impl fmt::Display for TaxIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxIdKind::Cpf => f.write_str("CPF"),
            TaxIdKind::Cnpj => f.write_str("CNPJ"),
        }
    }
}

/// A structurally valid identifier, holding only its digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaxId {
    Cpf(String),
    Cnpj(String),
}

impl TaxId {
    pub fn kind(&self) -> TaxIdKind {
        match self {
            TaxId::Cpf(_) => TaxIdKind::Cpf,
            TaxId::Cnpj(_) => TaxIdKind::Cnpj,
        }
    }

    pub fn digits(&self) -> &str {
        match self {
            TaxId::Cpf(digits) | TaxId::Cnpj(digits) => digits,
        }
    }

    pub fn into_digits(self) -> String {
        match self {
            TaxId::Cpf(digits) | TaxId::Cnpj(digits) => digits,
        }
    }

    /// Render with the conventional mask: `000.000.000-00` or `00.000.000/0000-00`.
    pub fn formatted(&self) -> String {
        let d = self.digits();
        match self {
            TaxId::Cpf(_) => format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]),
            TaxId::Cnpj(_) => format!(
                "{}.{}.{}/{}-{}",
                &d[0..2],
                &d[2..5],
                &d[5..8],
                &d[8..12],
                &d[12..14]
            ),
        }
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxIdError {
    #[error("expected 11 (CPF) or 14 (CNPJ) digits, found {found}")]
    WrongLength { found: usize },
    #[error("{kind} made of a single repeated digit")]
    RepeatedDigits { kind: TaxIdKind },
    #[error("{kind} check digit at position {position} does not match")]
    CheckDigitMismatch { kind: TaxIdKind, position: usize },
}

impl TaxIdError {
    /// Message shown next to the form field.
    pub fn field_message(&self) -> &'static str {
        match self {
            TaxIdError::WrongLength { .. } => "Invalid CPF or CNPJ.",
            TaxIdError::RepeatedDigits { kind: TaxIdKind::Cpf }
            | TaxIdError::CheckDigitMismatch { kind: TaxIdKind::Cpf, .. } => "Invalid CPF.",
            TaxIdError::RepeatedDigits { kind: TaxIdKind::Cnpj }
            | TaxIdError::CheckDigitMismatch { kind: TaxIdKind::Cnpj, .. } => "Invalid CNPJ.",
        }
    }
}

pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a CPF or CNPJ, choosing the algorithm from the digit count.
pub fn validate_tax_id(input: &str) -> Result<TaxId, TaxIdError> {
    let digits = strip_non_digits(input);
    let kind = match digits.len() {
        CPF_LEN => TaxIdKind::Cpf,
        CNPJ_LEN => TaxIdKind::Cnpj,
        found => return Err(TaxIdError::WrongLength { found }),
    };

    let values: Vec<u32> = digits.bytes().map(|b| u32::from(b - b'0')).collect();
    if values.iter().all(|&d| d == values[0]) {
        return Err(TaxIdError::RepeatedDigits { kind });
    }

    match kind {
        TaxIdKind::Cpf => check_cpf(&values)?,
        TaxIdKind::Cnpj => check_cnpj(&values)?,
    }

    Ok(match kind {
        TaxIdKind::Cpf => TaxId::Cpf(digits),
        TaxIdKind::Cnpj => TaxId::Cnpj(digits),
    })
}

pub fn is_valid_tax_id(input: &str) -> bool {
    validate_tax_id(input).is_ok()
}

pub fn is_valid_cpf(input: &str) -> bool {
    matches!(validate_tax_id(input), Ok(TaxId::Cpf(_)))
}

pub fn is_valid_cnpj(input: &str) -> bool {
    matches!(validate_tax_id(input), Ok(TaxId::Cnpj(_)))
}

fn check_cpf(d: &[u32]) -> Result<(), TaxIdError> {
    for position in [9, 10] {
        if cpf_check_digit(&d[..position]) != d[position] {
            return Err(TaxIdError::CheckDigitMismatch {
                kind: TaxIdKind::Cpf,
                position,
            });
        }
    }
    Ok(())
}

fn check_cnpj(d: &[u32]) -> Result<(), TaxIdError> {
    if cnpj_check_digit(&d[..12], &CNPJ_FIRST_WEIGHTS) != d[12] {
        return Err(TaxIdError::CheckDigitMismatch {
            kind: TaxIdKind::Cnpj,
            position: 12,
        });
    }
    if cnpj_check_digit(&d[..13], &CNPJ_SECOND_WEIGHTS) != d[13] {
        return Err(TaxIdError::CheckDigitMismatch {
            kind: TaxIdKind::Cnpj,
            position: 13,
        });
    }
    Ok(())
}

// Weights run from len+1 down to 2.
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();
    match (sum * 10) % 11 {
        10 => 0,
        digit => digit,
    }
}

fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}
