use body_health::validation::{
    is_valid_cnpj, is_valid_cpf, is_valid_tax_id, strip_non_digits, validate_tax_id, TaxId,
    TaxIdError, TaxIdKind,
};
use proptest::prelude::*;

/// Independent modulo-11 check digit: remainders 0 and 1 map to 0.
fn check_digit(digits: &[u32], weights: impl Iterator<Item = u32>) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

fn complete_cpf(base: &[u32]) -> Vec<u32> {
    let mut digits = base.to_vec();
    let first = check_digit(&digits, (2..=10).rev());
    digits.push(first);
    let second = check_digit(&digits, (2..=11).rev());
    digits.push(second);
    digits
}

fn complete_cnpj(base: &[u32]) -> Vec<u32> {
    let weights = |len: usize| (0..len).map(move |i| [2, 3, 4, 5, 6, 7, 8, 9][(len - 1 - i) % 8]);
    let mut digits = base.to_vec();
    let first = check_digit(&digits, weights(12));
    digits.push(first);
    let second = check_digit(&digits, weights(13));
    digits.push(second);
    digits
}

fn render(digits: &[u32]) -> String {
    digits
        .iter()
        .map(|d| char::from_digit(*d, 10).unwrap())
        .collect()
}

fn not_repeated(base: &[u32]) -> bool {
    base.iter().any(|&d| d != base[0])
}

proptest! {
    #[test]
    fn generated_cpfs_are_valid(base in prop::collection::vec(0u32..10, 9)) {
        prop_assume!(not_repeated(&base));
        let cpf = render(&complete_cpf(&base));

        let tax_id = validate_tax_id(&cpf).unwrap();
        prop_assert_eq!(tax_id.kind(), TaxIdKind::Cpf);
        prop_assert_eq!(tax_id.digits(), cpf.as_str());
        prop_assert!(is_valid_cpf(&cpf));
        prop_assert!(!is_valid_cnpj(&cpf));
    }

    #[test]
    fn generated_cnpjs_are_valid(base in prop::collection::vec(0u32..10, 12)) {
        prop_assume!(not_repeated(&base));
        let cnpj = render(&complete_cnpj(&base));

        prop_assert!(matches!(validate_tax_id(&cnpj), Ok(TaxId::Cnpj(_))));
        prop_assert!(is_valid_cnpj(&cnpj));
        prop_assert!(is_valid_tax_id(&cnpj));
    }

    #[test]
    fn mask_does_not_change_the_outcome(base in prop::collection::vec(0u32..10, 12)) {
        prop_assume!(not_repeated(&base));
        let cnpj = validate_tax_id(&render(&complete_cnpj(&base))).unwrap();

        let masked = cnpj.formatted();
        prop_assert_eq!(masked.len(), 18);
        prop_assert_eq!(validate_tax_id(&masked), Ok(cnpj));
    }

    #[test]
    fn wrong_check_digit_is_rejected(
        base in prop::collection::vec(0u32..10, 9),
        position in 9usize..11,
        shift in 1u32..10,
    ) {
        prop_assume!(not_repeated(&base));
        let mut digits = complete_cpf(&base);
        digits[position] = (digits[position] + shift) % 10;

        let result = validate_tax_id(&render(&digits));
        prop_assert!(result.is_err());
        prop_assert_eq!(result.unwrap_err().field_message(), "Invalid CPF.");
    }

    #[test]
    fn other_lengths_are_rejected(digits in "[0-9]{0,20}") {
        prop_assume!(digits.len() != 11 && digits.len() != 14);
        prop_assert_eq!(
            validate_tax_id(&digits),
            Err(TaxIdError::WrongLength { found: digits.len() })
        );
    }

    #[test]
    fn only_ascii_digits_survive_stripping(input in "\\PC{0,40}") {
        let digits = strip_non_digits(&input);
        prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(
            digits.len(),
            input.chars().filter(|c| c.is_ascii_digit()).count()
        );
    }
}

#[test]
fn repeated_digits_are_rejected_for_both_kinds() {
    for d in 0..10u32 {
        let digit = char::from_digit(d, 10).unwrap();
        let cpf: String = std::iter::repeat(digit).take(11).collect();
        let cnpj: String = std::iter::repeat(digit).take(14).collect();

        assert_eq!(
            validate_tax_id(&cpf),
            Err(TaxIdError::RepeatedDigits { kind: TaxIdKind::Cpf })
        );
        assert_eq!(
            validate_tax_id(&cnpj),
            Err(TaxIdError::RepeatedDigits { kind: TaxIdKind::Cnpj })
        );
    }
}
