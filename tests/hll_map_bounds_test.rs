use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use googletest::prelude::near;
use hlmap::{coupon, CouponMap, HllMap};

#[test]
fn bounds_bracket_the_point_estimate_across_many_coupons() {
    let mut map = HllMap::new(4, 1024).unwrap();
    let key = [3u8, 1, 4, 1];

    for i in 0..500u32 {
        let c = coupon::coupon_for(&i.to_be_bytes(), 1024);
        map.update(&key, c).unwrap();
    }

    let est = map.estimate(&key).unwrap();
    assert_that!(est, ge(map.lower_bound(&key).unwrap()));
    assert_that!(est, le(map.upper_bound(&key).unwrap()));
}

#[test]
fn bounds_widen_by_the_fixed_relative_standard_error() {
    let mut map = HllMap::new(4, 1024).unwrap();
    let key = [9u8, 9, 9, 9];
    map.update(&key, coupon::make_coupon(2, 6)).unwrap();

    let est = map.estimate(&key).unwrap();
    let rse = 0.836 / 1024.0_f64.sqrt();

    assert_that!(map.upper_bound(&key).unwrap(), near(est * (1.0 + rse), 1e-9));
    assert_that!(map.lower_bound(&key).unwrap(), near(est * (1.0 - rse), 1e-9));
}

#[test]
fn absent_key_estimates_and_bounds_to_zero() {
    let map = HllMap::new(4, 1024).unwrap();
    let key = [0u8, 0, 0, 0];

    assert_eq!(map.estimate(&key).unwrap(), 0.0);
    assert_eq!(map.lower_bound(&key).unwrap(), 0.0);
    assert_eq!(map.upper_bound(&key).unwrap(), 0.0);
}
