use super::*;
use crate::section::Section;

fn warn_error() -> MzTabError {
    MzTabError::new(ErrorKind::UnsupportedVersion {
        version: "0.9".to_string(),
    })
}

fn hard_error() -> MzTabError {
    MzTabError::new(ErrorKind::SectionScoreNotDefined {
        section: Section::ProteinHeader,
    })
}

#[test]
fn test_codes_and_categories() {
    assert_eq!(hard_error().code(), 2005);
    assert_eq!(hard_error().category(), Category::Logical);
    assert_eq!(warn_error().category(), Category::Format);
    assert_eq!(warn_error().level(), Level::Warn);
}

#[test]
fn test_display_includes_level_code_and_line() {
    let text = hard_error().at_line(7).to_string();
    assert_eq!(
        text,
        "[Error-2005] line 7: protein search engine score not defined in metadata"
    );
}

#[test]
fn test_level_threshold_drops_lower_levels() {
    let mut list = MzTabErrorList::new(Level::Error, 10);
    assert!(!list.add(warn_error()).unwrap());
    assert!(list.add(hard_error()).unwrap());
    assert_eq!(list.len(), 1);
}

#[test]
fn test_overflow_is_fatal() {
    let mut list = MzTabErrorList::new(Level::Warn, 2);
    list.add(hard_error()).unwrap();
    list.add(warn_error()).unwrap();
    let err = list.add(hard_error()).unwrap_err();
    assert!(matches!(err, ParseError::Overflow { capacity: 2 }));
    assert_eq!(list.len(), 2);
}

#[test]
fn test_at_or_above_filters() {
    let mut list = MzTabErrorList::unbounded();
    list.add(warn_error()).unwrap();
    list.add(hard_error()).unwrap();
    assert_eq!(list.at_or_above(Level::Warn).count(), 2);
    assert_eq!(list.at_or_above(Level::Error).count(), 1);
    assert!(list.has_errors_at(Level::Error));
}

#[test]
fn test_level_parsing() {
    assert_eq!("warn".parse::<Level>().unwrap(), Level::Warn);
    assert_eq!("ERROR".parse::<Level>().unwrap(), Level::Error);
    assert!("info".parse::<Level>().is_err());
}

#[test]
fn test_collect_is_unbounded() {
    let list: MzTabErrorList = std::iter::repeat_with(warn_error)
        .take(DEFAULT_MAX_ERRORS + 1)
        .chain(std::iter::once(hard_error()))
        .collect();
    assert_eq!(list.capacity(), None);
    assert_eq!(list.level(), Level::Warn);
    assert_eq!(list.len(), DEFAULT_MAX_ERRORS + 2);
    assert_eq!(list.iter().last(), Some(&hard_error()));
}
