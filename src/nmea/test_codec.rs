#[cfg(test)]
mod test {
    use crate::nmea::LineCodec;

    use bytes::BytesMut;

    use tokio_util::codec::Decoder;
    use tokio_util::codec::Encoder;

    #[test]
    fn test_line_codec_same_read() {
        let mut codec = LineCodec::default();

        // these two lines appeared in a single read from the device
        let mut bytes_mut = BytesMut::new();
        bytes_mut.extend_from_slice(
            b"$GPGGA,025134.000,4735.2887,N,12217.9631,W,1,10,0.90,27.1,M,-17.3,M,,*61\r\n",
        );
        bytes_mut.extend_from_slice(b"$GPGLL,4735.2887,N,12217.9631,W,025134.000,A,A*40\r\n");

        let first = codec.decode(&mut bytes_mut).unwrap().unwrap();
        let second = codec.decode(&mut bytes_mut).unwrap().unwrap();

        assert_eq!(
            b"$GPGGA,025134.000,4735.2887,N,12217.9631,W,1,10,0.90,27.1,M,-17.3,M,,*61".as_ref(),
            first
        );
        assert_eq!(
            b"$GPGLL,4735.2887,N,12217.9631,W,025134.000,A,A*40".as_ref(),
            second
        );
        assert!(codec.decode(&mut bytes_mut).unwrap().is_none());
    }

    #[test]
    fn test_line_codec_different_read() {
        let mut codec = LineCodec::default();

        // The line completes in a subsequent read
        let mut bytes_mut = BytesMut::new();
        bytes_mut.extend_from_slice(b"$GPGLL,4735.2887,N,12217.9631,W,");

        assert!(codec.decode(&mut bytes_mut).unwrap().is_none());

        bytes_mut.extend_from_slice(b"025134.000,A,A*40\r\n");

        let line = codec.decode(&mut bytes_mut).unwrap().unwrap();

        assert_eq!(
            b"$GPGLL,4735.2887,N,12217.9631,W,025134.000,A,A*40".as_ref(),
            line
        );
    }

    #[test]
    fn test_line_codec_bare_newline() {
        let mut codec = LineCodec::default();

        let mut bytes_mut = BytesMut::new();
        bytes_mut.extend_from_slice(b"$PGRMZ,+51.1,m,3*10\n");

        let line = codec.decode(&mut bytes_mut).unwrap().unwrap();

        assert_eq!(b"$PGRMZ,+51.1,m,3*10".as_ref(), line);
    }

    #[test]
    fn test_line_codec_encode() {
        let mut codec = LineCodec::default();

        let mut bytes_mut = BytesMut::new();
        codec
            .encode("PMTK251,38400".to_string(), &mut bytes_mut)
            .unwrap();

        assert_eq!(b"$PMTK251,38400*27\r\n".as_ref(), bytes_mut);
    }
}
