#[cfg(test)]
mod test {
    use crate::connman::ManagerState;
    use crate::connman::PropertyMap;
    use crate::connman::Service;
    use crate::connman::ServiceState;
    use crate::connman::Technology;
    use crate::connman::Variant;

    fn props(pairs: Vec<(&str, Variant)>) -> PropertyMap {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    #[test]
    fn test_service_new_defaults() {
        let service = Service::new("/s1", &PropertyMap::new());

        assert_eq!("/s1", service.path);
        assert_eq!("", service.name);
        assert_eq!("", service.service_type);
        assert!(!service.auto_connect);
        assert!(!service.favorite);
        assert!(service.security.is_empty());
        assert_eq!(ServiceState::Idle, service.state);
        assert_eq!(0, service.strength);
    }

    #[test]
    fn test_service_new() {
        let service = Service::new(
            "/s1",
            &props(vec![
                ("Name", Variant::from("harbor")),
                ("Type", Variant::from("wifi")),
                ("AutoConnect", Variant::from(true)),
                ("Favorite", Variant::from(true)),
                ("Security", Variant::from(vec!["psk", "wps"])),
                ("State", Variant::from("online")),
                ("Strength", Variant::from(81u8)),
            ]),
        );

        assert_eq!("harbor", service.name);
        assert_eq!("wifi", service.service_type);
        assert!(service.auto_connect);
        assert!(service.favorite);
        assert_eq!(vec!["psk", "wps"], service.security);
        assert_eq!(ServiceState::Online, service.state);
        assert_eq!(81, service.strength);
    }

    #[test]
    fn test_service_update_leaves_absent_fields() {
        let mut service = Service::new(
            "/s1",
            &props(vec![
                ("Name", Variant::from("harbor")),
                ("Type", Variant::from("wifi")),
                ("Strength", Variant::from(40u8)),
            ]),
        );

        service.update(&props(vec![("State", Variant::from("ready"))]));

        assert_eq!("harbor", service.name);
        assert_eq!("wifi", service.service_type);
        assert_eq!(40, service.strength);
        assert_eq!(ServiceState::Ready, service.state);
    }

    #[test]
    fn test_service_update_ignores_unknown_keys() {
        let mut service = Service::new("/s1", &PropertyMap::new());

        service.update(&props(vec![
            ("Ethernet", Variant::from("cable")),
            ("Nameservers", Variant::from(vec!["10.0.0.1"])),
        ]));

        assert_eq!(Service::new("/s1", &PropertyMap::new()), service);
    }

    #[test]
    fn test_service_update_ignores_mistyped_values() {
        let mut service = Service::new("/s1", &props(vec![("Strength", Variant::from(40u8))]));

        service.update(&props(vec![("Strength", Variant::from("strong"))]));

        assert_eq!(40, service.strength);
    }

    #[test]
    fn test_service_is_complete() {
        assert!(Service::is_complete(&props(vec![
            ("Name", Variant::from("harbor")),
            ("Type", Variant::from("wifi")),
        ])));
        assert!(!Service::is_complete(&props(vec![(
            "State",
            Variant::from("online")
        )])));
        assert!(!Service::is_complete(&props(vec![(
            "Name",
            Variant::from("harbor")
        )])));
    }

    #[test]
    fn test_service_state_from_wire() {
        assert_eq!(Some(ServiceState::Idle), ServiceState::from_wire("idle"));
        assert_eq!(
            Some(ServiceState::Failure),
            ServiceState::from_wire("failure")
        );
        assert_eq!(
            Some(ServiceState::Association),
            ServiceState::from_wire("association")
        );
        assert_eq!(
            Some(ServiceState::Configuration),
            ServiceState::from_wire("configuration")
        );
        assert_eq!(Some(ServiceState::Ready), ServiceState::from_wire("ready"));
        assert_eq!(
            Some(ServiceState::Disconnect),
            ServiceState::from_wire("disconnect")
        );
        assert_eq!(
            Some(ServiceState::Online),
            ServiceState::from_wire("online")
        );
        assert_eq!(None, ServiceState::from_wire("resurrecting"));
    }

    #[test]
    fn test_service_state_is_connected() {
        assert!(ServiceState::Ready.is_connected());
        assert!(ServiceState::Online.is_connected());
        assert!(!ServiceState::Idle.is_connected());
        assert!(!ServiceState::Failure.is_connected());
    }

    #[test]
    fn test_technology_new() {
        let technology = Technology::new(
            "/t1",
            &props(vec![
                ("Name", Variant::from("WiFi")),
                ("Type", Variant::from("wifi")),
                ("Connected", Variant::from(false)),
                ("Powered", Variant::from(true)),
            ]),
        );

        assert_eq!("/t1", technology.path);
        assert_eq!("WiFi", technology.name);
        assert_eq!("wifi", technology.technology_type);
        assert!(!technology.connected);
        assert!(technology.powered);
    }

    #[test]
    fn test_technology_update() {
        let mut technology = Technology::new(
            "/t1",
            &props(vec![
                ("Name", Variant::from("WiFi")),
                ("Type", Variant::from("wifi")),
            ]),
        );

        technology.update(&props(vec![("Powered", Variant::from(true))]));

        assert_eq!("WiFi", technology.name);
        assert!(technology.powered);
    }

    #[test]
    fn test_manager_state_from_wire() {
        assert_eq!(ManagerState::Offline, ManagerState::from_wire("offline"));
        assert_eq!(ManagerState::Idle, ManagerState::from_wire("idle"));
        assert_eq!(ManagerState::Ready, ManagerState::from_wire("ready"));
        assert_eq!(ManagerState::Online, ManagerState::from_wire("online"));
        assert_eq!(ManagerState::Unknown, ManagerState::from_wire("flooded"));
    }
}
