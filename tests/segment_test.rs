use mt799_intent::segment;

#[test]
fn segments_are_never_blank() {
    for text in [
        "",
        "   ",
        "...",
        "Extend.  . Pay!\n\n?Advise",
        "  a . b ! c ? ",
    ] {
        assert!(
            segment(text).iter().all(|s| !s.trim().is_empty() && s.trim() == s),
            "{text:?}"
        );
    }
}

#[test]
fn segments_reconstruct_text_without_terminators() {
    let text = "Please extend the guarantee. If not, pay the full amount! Can you confirm?";
    let joined: String = segment(text).concat();
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '.' | '!' | '?') && !c.is_whitespace())
        .collect();
    assert_eq!(joined.replace(char::is_whitespace, ""), stripped);
}

#[test]
fn clauses_stay_in_order() {
    assert_eq!(
        segment("Extend the guarantee by 30 days. Otherwise pay on demand."),
        vec!["Extend the guarantee by 30 days", "Otherwise pay on demand"]
    );
}

#[test]
fn dotted_dates_split() {
    assert_eq!(
        segment("Pay before 31.12.2025 please"),
        vec!["Pay before 31", "12", "2025 please"]
    );
}

#[test]
fn multiline_narrative_without_terminator() {
    assert_eq!(
        segment("Please extend\nthe guarantee"),
        vec!["Please extend\nthe guarantee"]
    );
}
