use crate::config::{EncoderConfig, LanguageCodeMode};
use crate::domain::payload::{DataFields, LanguageEntry, Merchant};
use crate::domain::tlv::{Segment, Tag, pad, tlv};
use crate::error::{QrError, Result};

const GUID_KEY: &str = "guid";

/// Fixed sub-tags of the merchant-specific data template (tag `62`).
const DATA_TAGS: [(&str, u32); 9] = [
    ("bill", 1),
    ("mobile", 2),
    ("store", 3),
    ("loyalty", 4),
    ("reference", 5),
    ("customer", 6),
    ("terminal", 7),
    ("purpose", 8),
    ("request", 9),
];

/// Resolves a caller-supplied key to a sub-tag.
fn extension_tag(key: &str, config: &EncoderConfig) -> Result<Tag> {
    if config.is_strict() {
        Tag::parse(key)
    } else {
        Tag::padded(key)
    }
}

/// Encodes the merchant account information under the operator's own tag.
///
/// `guid` is emitted as sub-tag `00`; every other key is used as its own tag.
/// Sub-fields keep the caller's order, so `guid` is only first if listed first.
pub fn merchant_account(merchant: &Merchant, config: &EncoderConfig) -> Result<String> {
    if config.is_strict() {
        if merchant.account_operator > 99 {
            return Err(QrError::InvalidFieldValue {
                field: "accountOperator",
                reason: format!("{} does not fit in two digits", merchant.account_operator),
            });
        }
        if !merchant.info.contains_key(GUID_KEY) {
            return Err(QrError::MissingRequiredField("merchant.info.guid"));
        }
    }

    let mut inner = String::new();
    for (key, value) in merchant.info.iter() {
        let tag = match key {
            GUID_KEY => Tag::from_number(0),
            _ => extension_tag(key, config)?,
        };
        Segment::new(tag, value)?.write_to(&mut inner);
    }

    tlv(Tag::from_number(merchant.account_operator), &inner)
}

/// Encodes every language entry into one flat stream wrapped in tag `64`.
///
/// Entries carry no boundary markers of their own.
pub fn language_template(entries: &[LanguageEntry], config: &EncoderConfig) -> Result<String> {
    let mut inner = String::new();
    for entry in entries {
        if config.is_strict() {
            if !entry.0.contains_key("language") {
                return Err(QrError::MissingRequiredField("languageTemplate.language"));
            }
            if !entry.0.contains_key("name") {
                return Err(QrError::MissingRequiredField("languageTemplate.name"));
            }
        }

        for (key, value) in entry.0.iter() {
            let segment = match key {
                "language" => match config.language_code {
                    LanguageCodeMode::Legacy => Segment::new(Tag::from_number(0), pad(value, 2))?,
                    LanguageCodeMode::Verbatim => Segment::new(Tag::from_number(0), value)?,
                },
                "name" => Segment::new(Tag::from_number(1), value)?,
                "city" => Segment::new(Tag::from_number(2), value)?,
                _ => Segment::new(extension_tag(key, config)?, value)?,
            };
            segment.write_to(&mut inner);
        }
    }

    tlv(Tag::LANGUAGE_TEMPLATE, &inner)
}

/// Encodes the merchant-specific data fields wrapped in tag `62`.
pub fn data_template(data: &DataFields, config: &EncoderConfig) -> Result<String> {
    let mut inner = String::new();
    for (key, value) in data.0.iter() {
        let tag = match DATA_TAGS.iter().find(|(name, _)| *name == key) {
            Some((_, number)) => Tag::from_number(*number),
            None => extension_tag(key, config)?,
        };
        Segment::new(tag, value)?.write_to(&mut inner);
    }

    tlv(Tag::DATA_TEMPLATE, &inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::FieldList;

    fn permissive() -> EncoderConfig {
        EncoderConfig::default()
    }

    #[test]
    fn test_merchant_account_guid() {
        let merchant = Merchant::new(1, FieldList::new().with("guid", "A000000123456"));
        let encoded = merchant_account(&merchant, &permissive()).unwrap();
        assert_eq!(encoded, "01170013A000000123456");
    }

    #[test]
    fn test_merchant_account_keeps_caller_order() {
        let merchant = Merchant::new(
            26,
            FieldList::new().with("01", "abc").with("guid", "hk.com.hkicl"),
        );
        let encoded = merchant_account(&merchant, &permissive()).unwrap();
        assert_eq!(encoded, String::from("2623") + "0103abc" + "0012hk.com.hkicl");
    }

    #[test]
    fn test_merchant_account_empty_info() {
        let merchant = Merchant::new(30, FieldList::new());
        assert_eq!(merchant_account(&merchant, &permissive()).unwrap(), "3000");
    }

    #[test]
    fn test_merchant_account_outer_length_matches_inner() {
        let info = FieldList::new().with("guid", "X".repeat(20)).with("05", "12345");
        for operator in 0..=99 {
            let merchant = Merchant::new(operator, info.clone());
            let encoded = merchant_account(&merchant, &permissive()).unwrap();
            let inner_len = encoded.len() - 4;
            assert_eq!(&encoded[..2], pad(operator, 2));
            assert_eq!(&encoded[2..4], pad(inner_len, 2));
        }
    }

    #[test]
    fn test_merchant_account_pads_short_keys_when_permissive() {
        let merchant = Merchant::new(26, FieldList::new().with("5", "x"));
        assert_eq!(merchant_account(&merchant, &permissive()).unwrap(), "26050501x");
    }

    #[test]
    fn test_merchant_account_strict() {
        let config = EncoderConfig::strict();

        let short_key = Merchant::new(26, FieldList::new().with("guid", "g").with("5", "x"));
        assert!(matches!(
            merchant_account(&short_key, &config),
            Err(QrError::InvalidTag(_))
        ));

        let no_guid = Merchant::new(26, FieldList::new().with("01", "x"));
        assert!(matches!(
            merchant_account(&no_guid, &config),
            Err(QrError::MissingRequiredField(_))
        ));

        let big_operator = Merchant::new(126, FieldList::new().with("guid", "g"));
        assert!(matches!(
            merchant_account(&big_operator, &config),
            Err(QrError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_merchant_account_overflow() {
        let merchant = Merchant::new(
            26,
            FieldList::new().with("guid", "x".repeat(60)).with("01", "y".repeat(40)),
        );
        assert!(matches!(
            merchant_account(&merchant, &permissive()),
            Err(QrError::LengthOverflow { .. })
        ));
    }

    #[test]
    fn test_language_template_flattens_entries() {
        let entries = vec![
            LanguageEntry::new("ZH", "測試店").with("city", "香港"),
            LanguageEntry::new("EN", "Shop"),
        ];
        let encoded = language_template(&entries, &permissive()).unwrap();
        let inner = "0002ZH".to_string() + "0103測試店" + "0202香港" + "0002EN" + "0104Shop";
        assert_eq!(encoded, format!("64{:02}{}", inner.chars().count(), inner));
    }

    #[test]
    fn test_language_code_modes() {
        let entries = vec![LanguageEntry::new("zh-HK", "A")];

        let verbatim = language_template(&entries, &permissive()).unwrap();
        assert_eq!(verbatim, "64140005zh-HK0101A");

        let legacy = EncoderConfig {
            language_code: LanguageCodeMode::Legacy,
            ..EncoderConfig::default()
        };
        assert_eq!(language_template(&entries, &legacy).unwrap(), "64110002HK0101A");
    }

    #[test]
    fn test_language_template_strict_requires_name() {
        let entries = vec![LanguageEntry(FieldList::new().with("language", "ZH"))];
        assert!(language_template(&entries, &permissive()).is_ok());
        assert!(matches!(
            language_template(&entries, &EncoderConfig::strict()),
            Err(QrError::MissingRequiredField("languageTemplate.name"))
        ));
    }

    #[test]
    fn test_data_template_fixed_tags() {
        let data = DataFields::new()
            .with("bill", "B1")
            .with("request", "ME")
            .with("terminal", "T9")
            .with("50", "ext");
        let encoded = data_template(&data, &permissive()).unwrap();
        assert_eq!(encoded, String::from("6225") + "0102B1" + "0902ME" + "0702T9" + "5003ext");
    }

    #[test]
    fn test_data_template_is_deterministic() {
        let data = DataFields::new().with("store", "S-01").with("purpose", "lunch");
        let first = data_template(&data, &permissive()).unwrap();
        let second = data_template(&data, &permissive()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("62"));
    }
}
