//! Ban list behaviour through the public API: kick-bans, expiry,
//! network bans, export/import and clearing.

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use voxban::security::ban_list::IPV4_MAPPED_OFFSET;
use voxban::{BanError, BanList, BanRecord, ClientIdentity, Fingerprint, RecordError};

fn fingerprint(seed: u8) -> Fingerprint {
    let mut bytes = [0u8; 20];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = seed.wrapping_add(i as u8);
    }
    Fingerprint::new(bytes)
}

fn network_record(addr: Ipv4Addr, prefix: u8, duration: u32) -> BanRecord {
    BanRecord {
        address: addr.to_ipv6_mapped().octets(),
        prefix_length: u32::from(IPV4_MAPPED_OFFSET + prefix),
        username: String::new(),
        fingerprint: fingerprint(0xA0).to_hex(),
        reason: "range ban".to_string(),
        created_at: "2024-01-01T00:00:00".to_string(),
        duration,
    }
}

#[test]
fn timed_kickban_lifecycle() {
    let t0 = Instant::now();
    let mut list = BanList::new(60);
    let fp = fingerprint(1);
    let client = ClientIdentity::new(fp, Ipv4Addr::new(203, 0, 113, 5), "mallory");

    list.ban(&client, "kicked");
    assert!(list.is_banned_by_fingerprint(&fp));

    list.prune_expired_at(t0 + Duration::from_secs(59));
    assert!(list.is_banned_by_fingerprint(&fp));
    assert!(list.is_banned_by_address(Ipv4Addr::new(203, 0, 113, 5)));

    list.prune_expired_at(t0 + Duration::from_secs(61));
    assert!(!list.is_banned_by_fingerprint(&fp));
    assert!(!list.is_banned_by_address(Ipv4Addr::new(203, 0, 113, 5)));
    assert_eq!(list.len(), 0);
}

#[test]
fn permanent_ban_survives_any_number_of_prunes() {
    let t0 = Instant::now();
    let mut list = BanList::new(0);
    let fp = fingerprint(2);
    list.ban(&ClientIdentity::new(fp, Ipv4Addr::new(192, 0, 2, 1), "eve"), "permanent");

    for days in [0u64, 1, 30, 365, 3650] {
        assert_eq!(list.prune_expired_at(t0 + Duration::from_secs(days * 86_400)), 0);
    }
    assert!(list.is_banned_by_fingerprint(&fp));
    assert_eq!(list.len(), 1);
}

#[test]
fn imported_slash_24_matches_whole_network() {
    let mut list = BanList::new(0);
    list.import_all(&[network_record(Ipv4Addr::new(198, 51, 100, 0), 24, 0)])
        .unwrap();

    assert!(list.is_banned_by_address(Ipv4Addr::new(198, 51, 100, 200)));
    assert!(list.is_banned_by_address(Ipv4Addr::new(198, 51, 100, 1)));
    assert!(!list.is_banned_by_address(Ipv4Addr::new(198, 51, 101, 1)));
}

#[test]
fn imported_slash_0_matches_everything() {
    let mut list = BanList::new(0);
    list.import_all(&[network_record(Ipv4Addr::new(198, 51, 100, 0), 0, 0)])
        .unwrap();

    assert!(list.is_banned_by_address(Ipv4Addr::new(8, 8, 8, 8)));
    assert!(list.is_banned_by_address(Ipv4Addr::new(255, 255, 255, 255)));
}

#[test]
fn export_import_round_trip() {
    let mut source = BanList::new(600);
    source.ban(
        &ClientIdentity::new(fingerprint(3), Ipv4Addr::new(203, 0, 113, 9), "alice"),
        "noise",
    );
    source.ban(
        &ClientIdentity::new(fingerprint(4), Ipv4Addr::new(203, 0, 113, 10), "bob"),
        "spam",
    );
    source
        .import_all(&[network_record(Ipv4Addr::new(10, 1, 0, 0), 16, 90)])
        .unwrap();

    let exported = source.export_all();
    assert_eq!(exported.len(), 3);
    assert!(exported[0].fingerprint.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_eq!(exported[0].fingerprint.len(), 40);
    assert_eq!(exported[0].created_at.len(), "YYYY-MM-DDTHH:MM:SS".len());

    let mut restored = BanList::new(0);
    restored.clear_all();
    assert_eq!(restored.import_all(&exported).unwrap(), 3);

    let key = |list: &BanList| {
        list.iter()
            .map(|b| {
                (
                    *b.fingerprint(),
                    b.addr(),
                    b.prefix_len(),
                    b.username().to_string(),
                    b.reason().to_string(),
                    b.duration(),
                    b.created_at().timestamp(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(key(&restored), key(&source));
}

#[test]
fn import_restarts_duration_clock() {
    let mut source = BanList::new(60);
    let fp = fingerprint(5);
    source.ban(&ClientIdentity::new(fp, Ipv4Addr::new(192, 0, 2, 50), "carol"), "x");
    let records = source.export_all();

    let before_import = Instant::now();
    let mut restored = BanList::new(0);
    restored.import_all(&records).unwrap();

    let started = restored.iter().next().unwrap().started();
    assert!(started >= before_import);
    assert_eq!(restored.prune_expired_at(started + Duration::from_secs(59)), 0);
    assert_eq!(restored.prune_expired_at(started + Duration::from_secs(60)), 1);
}

#[test]
fn malformed_record_leaves_earlier_entries() {
    let mut list = BanList::new(0);
    let good = network_record(Ipv4Addr::new(192, 0, 2, 0), 24, 0);
    let mut bad_time = good.clone();
    bad_time.created_at = "2024/01/01".to_string();
    let mut bad_prefix = good.clone();
    bad_prefix.prefix_length = 64;

    let err = list.import_all(&[good.clone(), bad_time, good.clone()]).unwrap_err();
    assert!(matches!(
        err,
        BanError::Record {
            index: 1,
            source: RecordError::InvalidTimestamp(_)
        }
    ));
    assert_eq!(list.len(), 1);

    assert_eq!(
        list.import_record(&bad_prefix),
        Err(RecordError::InvalidPrefix(64))
    );
    assert_eq!(list.len(), 1);
}

#[test]
fn clear_then_query_finds_nothing() {
    let mut list = BanList::new(0);
    let fp = fingerprint(6);
    list.ban(&ClientIdentity::new(fp, Ipv4Addr::new(192, 0, 2, 77), "dave"), "x");
    list.import_all(&[network_record(Ipv4Addr::new(10, 0, 0, 0), 8, 0)])
        .unwrap();

    list.clear_all();
    assert_eq!(list.len(), 0);
    assert!(!list.is_banned_by_fingerprint(&fp));
    assert!(!list.is_banned_by_address(Ipv4Addr::new(192, 0, 2, 77)));
    assert!(!list.is_banned_by_address(Ipv4Addr::new(10, 20, 30, 40)));
}
