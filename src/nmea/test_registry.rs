#[cfg(test)]
mod test {
    use crate::nmea::Device;
    use crate::nmea::DeviceRegistry;

    use async_trait::async_trait;

    use bytes::Bytes;

    use std::collections::VecDeque;
    use std::io;
    use std::sync::Arc;
    use std::sync::Mutex;

    enum Step {
        Line(&'static [u8]),
        Fail,
    }

    struct ScriptedDevice {
        id: String,
        steps: Mutex<VecDeque<Step>>,
    }

    impl ScriptedDevice {
        fn new(id: &str, steps: Vec<Step>) -> Arc<Self> {
            Arc::new(ScriptedDevice {
                id: id.to_string(),
                steps: Mutex::new(steps.into()),
            })
        }
    }

    #[async_trait]
    impl Device for ScriptedDevice {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            "scripted"
        }

        async fn read_line(&self) -> io::Result<Bytes> {
            let step = self.steps.lock().unwrap().pop_front();

            match step {
                Some(Step::Line(bytes)) => Ok(Bytes::from_static(bytes)),
                Some(Step::Fail) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "hung up")),
                None => futures::future::pending().await,
            }
        }

        async fn write(&self, _bytes: &[u8]) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let registry = DeviceRegistry::new();

        let first = ScriptedDevice::new("D1", vec![]);
        let second = ScriptedDevice::new("D1", vec![]);

        assert!(registry.register(first).is_some());
        assert!(registry.register(second).is_none());
        assert_eq!(1, registry.list().len());
    }

    #[tokio::test]
    async fn test_get() {
        let registry = DeviceRegistry::new();

        registry.register(ScriptedDevice::new("D1", vec![]));

        assert!(registry.get("D1").is_some());
        assert!(registry.get("D2").is_none());
    }

    #[tokio::test]
    async fn test_sentence_reaches_stream() {
        let registry = DeviceRegistry::new();
        let mut stream = registry.open_stream();

        let device = ScriptedDevice::new("D1", vec![Step::Line(b"$PGRMZ,+51.1,m,3*10\r\n")]);
        registry.register(device);

        let sentence = stream.read().await.unwrap();

        assert_eq!("D1", sentence.device_id);
        assert_eq!("PGRMZ", sentence.datatype);
        assert_eq!(vec!["+51.1", "m", "3"], sentence.fields);
    }

    #[tokio::test]
    async fn test_invalid_sentence_is_dropped() {
        let registry = DeviceRegistry::new();
        let mut stream = registry.open_stream();

        let device = ScriptedDevice::new(
            "D1",
            vec![
                Step::Line(b"$BOGUS,1*FF\r\n"),
                Step::Line(b"not nmea at all\r\n"),
                Step::Line(b"$PGRMZ,+51.1,m,3*10\r\n"),
            ],
        );
        registry.register(device);

        let sentence = stream.read().await.unwrap();

        assert_eq!("PGRMZ", sentence.datatype);
        assert_eq!(1, registry.list().len());
    }

    #[tokio::test]
    async fn test_read_error_removes_device() {
        let registry = DeviceRegistry::new();

        let device = ScriptedDevice::new("D1", vec![Step::Fail]);
        let reader = registry.register(device).unwrap();

        reader.await.unwrap();

        assert!(registry.list().is_empty());
        assert!(registry.get("D1").is_none());
    }

    #[tokio::test]
    async fn test_decode_error_removes_device() {
        let registry = DeviceRegistry::new();

        let device = ScriptedDevice::new("D1", vec![Step::Line(b"$PGRMZ,\xff\xfe,m,3*10\r\n")]);
        let reader = registry.register(device).unwrap();

        reader.await.unwrap();

        assert!(registry.list().is_empty());
    }

    #[tokio::test]
    async fn test_failed_device_does_not_stall_others() {
        let registry = DeviceRegistry::new();
        let mut stream = registry.open_stream();

        let broken = ScriptedDevice::new("D1", vec![Step::Fail]);
        let healthy = ScriptedDevice::new("D2", vec![Step::Line(b"$PGRMZ,+51.1,m,3*10\r\n")]);

        let reader = registry.register(broken).unwrap();
        registry.register(healthy);

        reader.await.unwrap();

        let sentence = stream.read().await.unwrap();

        assert_eq!("D2", sentence.device_id);
        assert_eq!(1, registry.list().len());
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = DeviceRegistry::new();

        registry.register(ScriptedDevice::new("D1", vec![]));
        registry.remove("D1");

        assert!(registry.list().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown() {
        let registry = DeviceRegistry::new();

        registry.register(ScriptedDevice::new("D1", vec![]));
        registry.register(ScriptedDevice::new("D2", vec![]));

        registry.shutdown();

        assert!(registry.list().is_empty());
    }
}
