#[cfg(test)]
mod test {
    use crate::nmea::Multiplexer;
    use crate::nmea::Sentence;
    use crate::nmea::STREAM_CAPACITY;

    fn sentence(n: usize) -> Sentence {
        Sentence {
            device_id: "D1".to_string(),
            raw: format!("$TEST,{}*00", n),
            datatype: "TEST".to_string(),
            fields: vec![n.to_string()],
        }
    }

    #[tokio::test]
    async fn test_publish_without_streams() {
        let mux = Multiplexer::new();

        mux.publish(sentence(0));

        let mut stream = mux.open();

        mux.publish(sentence(1));

        // only sentences published after the stream opened arrive
        assert_eq!(vec!["1"], stream.read().await.unwrap().fields);
    }

    #[tokio::test]
    async fn test_streams_read_independently() {
        let mux = Multiplexer::new();

        let mut first = mux.open();
        let mut second = mux.open();

        mux.publish(sentence(0));
        mux.publish(sentence(1));

        assert_eq!(vec!["0"], first.read().await.unwrap().fields);
        assert_eq!(vec!["0"], second.read().await.unwrap().fields);
        assert_eq!(vec!["1"], first.read().await.unwrap().fields);
        assert_eq!(vec!["1"], second.read().await.unwrap().fields);
    }

    #[tokio::test]
    async fn test_slow_stream_loses_oldest() {
        let mux = Multiplexer::new();

        let mut first = mux.open();
        let mut second = mux.open();

        let published = STREAM_CAPACITY + 50;

        for n in 0..published {
            mux.publish(sentence(n));
        }

        // each stream sees a suffix of the publish sequence, in order
        for n in (published - STREAM_CAPACITY)..published {
            assert_eq!(vec![n.to_string()], first.read().await.unwrap().fields);
            assert_eq!(vec![n.to_string()], second.read().await.unwrap().fields);
        }
    }

    #[tokio::test]
    async fn test_read_ends_when_multiplexer_dropped() {
        let mux = Multiplexer::new();

        let mut stream = mux.open();

        mux.publish(sentence(0));
        drop(mux);

        assert!(stream.read().await.is_some());
        assert!(stream.read().await.is_none());
    }
}
