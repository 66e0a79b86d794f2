#[cfg(test)]
mod test {
    use crate::nmea::checksum;
    use crate::nmea::format;
    use crate::nmea::is_valid;
    use crate::nmea::parse;
    use crate::nmea::SentenceError;

    #[test]
    fn test_checksum() {
        assert_eq!("10", checksum("PGRMZ,+51.1,m,3"));
        assert_eq!("27", checksum("PMTK251,38400"));
        assert_eq!("00", checksum(""));
    }

    #[test]
    fn test_format() {
        assert_eq!("$PGRMZ,+51.1,m,3*10", format("PGRMZ,+51.1,m,3"));
        assert_eq!("$PMTK251,38400*27", format("PMTK251,38400"));
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("$PGRMZ,+51.1,m,3*10"));
        assert!(is_valid(
            "$GPGLL,4735.2887,N,12217.9631,W,025134.000,A,A*40"
        ));
    }

    #[test]
    fn test_is_valid_lowercase_checksum() {
        assert!(is_valid("$K*4b"));
        assert!(is_valid("$K*4B"));
    }

    #[test]
    fn test_is_valid_rejects_malformed() {
        // no leading dollar
        assert!(!is_valid("PGRMZ,+51.1,m,3*10"));
        // no checksum separator
        assert!(!is_valid("$PGRMZ,+51.1,m,3"));
        // more than one separator
        assert!(!is_valid("$PGRMZ,+51.1*m,3*10"));
        // wrong checksum
        assert!(!is_valid("$PGRMZ,+51.1,m,3*11"));
        // trailing bytes after the checksum
        assert!(!is_valid("$PGRMZ,+51.1,m,3*10x"));
        // one-digit checksum
        assert!(!is_valid("$K*4"));
    }

    #[test]
    fn test_parse() {
        let sentence = parse("D1", b"$PGRMZ,+51.1,m,3*10\r\n").unwrap();

        assert_eq!("D1", sentence.device_id);
        assert_eq!("$PGRMZ,+51.1,m,3*10", sentence.raw);
        assert_eq!("PGRMZ", sentence.datatype);
        assert_eq!(vec!["+51.1", "m", "3"], sentence.fields);
    }

    #[test]
    fn test_parse_no_fields() {
        let sentence = parse("D1", b"$PGRMZ*52\r\n").unwrap();

        assert_eq!("PGRMZ", sentence.datatype);
        assert!(sentence.fields.is_empty());
    }

    #[test]
    fn test_parse_keeps_empty_fields() {
        let line = format("GPGSA,A,3,,,,12");
        let sentence = parse("D1", line.as_bytes()).unwrap();

        assert_eq!("GPGSA", sentence.datatype);
        assert_eq!(vec!["A", "3", "", "", "", "12"], sentence.fields);
    }

    #[test]
    fn test_parse_round_trip() {
        let sentence = parse("D1", format("PMTK251,38400").as_bytes()).unwrap();

        assert_eq!("PMTK251", sentence.datatype);
        assert_eq!(vec!["38400"], sentence.fields);
    }

    #[test]
    fn test_parse_invalid_sentence_is_soft() {
        let error = parse("D1", b"$PGRMZ,+51.1,m,3*11\r\n").unwrap_err();

        assert!(matches!(error, SentenceError::Invalid(_)));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_parse_missing_dollar_is_soft() {
        let error = parse("D1", b"PGRMZ,+51.1,m,3*10\r\n").unwrap_err();

        assert!(matches!(error, SentenceError::Invalid(_)));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_parse_bad_encoding_is_fatal() {
        let error = parse("D1", b"$PGRMZ,\xff\xfe*10\r\n").unwrap_err();

        assert!(matches!(error, SentenceError::Encoding(_)));
        assert!(error.is_fatal());
    }
}
