use mt799_intent::extract_narrative;
use mt799_intent::narrative::{NarrativeRule, extract_with_rule};

const BLOCK_MESSAGE: &str = "{1:F01BANKBEBBAXXX0000000000}{2:I799BANKFRPPXXXXN}{4:\n\
:20:REF123\n\
:21:GUAR-2024-17\n\
:77E:Please extend the validity of the\n\
guarantee until 31 March.\n\
-}";

const FRENCH_MESSAGE: &str = "{1:F01BANKBEBBAXXX0057000289}{2:I799BANKITRXXXXXN}{4:
    20:123456
    79:NOTRE GARANTIE NO 123
    NOUS VOUS PRIONS DE BIEN VOULOIR PROROGER LA VALIDITE
    DE LA GARANTIE JUSQU'AU 31.12.2025 OU PROCEDER AU
    PAIEMENT SI LE BENEFICIAIRE LE DEMANDE.
    -}";

#[test]
fn field_77e_wins() {
    let (rule, text) = extract_with_rule(BLOCK_MESSAGE).unwrap();
    assert_eq!(rule, NarrativeRule::Field77E);
    assert_eq!(
        text,
        "Please extend the validity of the guarantee until 31 March."
    );
}

#[test]
fn field_77e_without_leading_colon() {
    let raw = "20:REF\n77E: Pay   the\tbeneficiary\n21:NEXT";
    assert_eq!(extract_narrative(raw), "Pay the beneficiary");
}

#[test]
fn field_77e_stops_at_closing_brace() {
    let raw = "{4:\n:77E:Extend or pay}{5:{CHK:ABC}}";
    assert_eq!(extract_narrative(raw), "Extend or pay");
}

#[test]
fn narrative_label_when_no_77e() {
    let raw = "Reference REF123\nNarrative: Please pay the full amount\nby Friday.\n:72:/ACC/";
    let (rule, text) = extract_with_rule(raw).unwrap();
    assert_eq!(rule, NarrativeRule::NarrativeLabel);
    assert_eq!(text, "Please pay the full amount by Friday.");
}

#[test]
fn narrative_label_is_case_insensitive() {
    assert_eq!(extract_narrative("NARRATIVE:  extend"), "extend");
}

#[test]
fn last_field_tag_fallback() {
    let raw = ":20C:REF\n:21A:OLD REF\n:79Z:Please confirm receipt of our guarantee.";
    let (rule, text) = extract_with_rule(raw).unwrap();
    assert_eq!(rule, NarrativeRule::LastFieldTag);
    assert_eq!(text, "Please confirm receipt of our guarantee.");
}

#[test]
fn field_79_isolates_french_narrative() {
    let (rule, text) = extract_with_rule(FRENCH_MESSAGE).unwrap();
    assert_eq!(rule, NarrativeRule::Field79);
    assert_eq!(
        text,
        "NOUS VOUS PRIONS DE BIEN VOULOIR PROROGER LA VALIDITE DE LA GARANTIE \
         JUSQU'AU 31.12.2025 OU PROCEDER AU PAIEMENT SI LE BENEFICIAIRE LE DEMANDE."
    );
    assert!(!text.contains("{1:"));
    assert!(!text.contains("20:123456"));
}

#[test]
fn single_line_field_79_keeps_its_text() {
    let raw = ":20:REF\n:79:Please advise";
    let (rule, text) = extract_with_rule(raw).unwrap();
    assert_eq!(rule, NarrativeRule::Field79);
    assert_eq!(text, "Please advise");
}

#[test]
fn lettered_tag_outranks_field_79() {
    let raw = ":79:REF\nPlease advise\n:72Z:Pay on receipt";
    let (rule, text) = extract_with_rule(raw).unwrap();
    assert_eq!(rule, NarrativeRule::LastFieldTag);
    assert_eq!(text, "Pay on receipt");
}

#[test]
fn no_markers_returns_trimmed_original() {
    let raw = "\n  Please extend the guarantee.  \n";
    assert_eq!(extract_narrative(raw), "Please extend the guarantee.");
}

#[test]
fn empty_input_stays_empty() {
    assert_eq!(extract_narrative(""), "");
    assert_eq!(extract_narrative("   "), "");
}

#[test]
fn extraction_is_idempotent() {
    for raw in [
        BLOCK_MESSAGE,
        FRENCH_MESSAGE,
        "Narrative: pay now",
        ":20C:REF\n:79Z:confirm",
        "  plain text  ",
    ] {
        let once = extract_narrative(raw);
        assert_eq!(extract_narrative(&once), once, "{raw:?}");
    }
}
