use hlmap::{coupon, CouponMap, ErrorKind, HllMap};

#[test]
fn table_grows_past_the_initial_157_slots_as_distinct_keys_accumulate() {
    let mut map = HllMap::new(4, 1024).unwrap();
    assert_eq!(map.table_entries(), 157);
    assert_eq!(map.capacity_entries(), 147);

    for i in 0..147u32 {
        map.update(&i.to_be_bytes(), coupon::make_coupon(0, 1)).unwrap();
    }
    assert_eq!(map.table_entries(), 157, "must not resize before capacity is exceeded");

    map.update(&147u32.to_be_bytes(), coupon::make_coupon(0, 1)).unwrap();
    assert_eq!(map.table_entries(), 317, "must resize once occupancy exceeds capacity");
    assert_eq!(map.capacity_entries(), 297);
    assert_eq!(map.current_count_entries(), 148);
}

#[test]
fn keys_survive_several_resizes_with_their_sketches_intact() {
    let mut map = HllMap::new(4, 1024).unwrap();
    let mut last_hip = Vec::new();

    for i in 0..1_000u32 {
        let key = i.to_be_bytes();
        let mut hip = 0.0;
        for j in 0..5u32 {
            let c = coupon::coupon_for(&(i * 31 + j).to_be_bytes(), 1024);
            hip = map.update(&key, c).unwrap();
        }
        last_hip.push((key, hip));
    }

    assert_eq!(map.current_count_entries(), 1_000);
    assert!(map.table_entries() > 157);

    for (key, hip) in last_hip {
        assert_eq!(map.estimate(&key).unwrap(), hip);
    }
}

#[test]
fn key_size_is_fixed_at_construction() {
    let mut map = HllMap::new(8, 64).unwrap();
    let err = map.update(b"short", coupon::make_coupon(0, 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);
}
