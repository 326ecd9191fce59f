//! Bucket-count recommendations for backing hash tables.
//!
//! Target load factor is about 0.75, so a table meant to hold `n` entries
//! wants roughly `1.33 n` buckets. Small tables are sized straight to a prime.
//! Large tables start smaller than that: the backing map doubles itself as it
//! fills, and the [`SIZE_MAP`] entries are chosen so that after at most four
//! doublings the bucket count lands just above the requested size instead of
//! overshooting it.

/// Requested sizes are inflated by this factor before lookup. Adjacent
/// candidates are at most about 4% apart, so 29% lands near the 33% target.
const SCALE: f64 = 1.29;

/// Below this (scaled) size the answer comes from [`PRIMES`].
const SMALL_LIMIT: i32 = 197;

/// Ascending primes used for small tables.
pub static PRIMES: [i32; 15] = [3, 7, 11, 17, 23, 29, 37, 47, 59, 71, 89, 107, 131, 163, 197];

/// `(size_threshold, bucket_count)` pairs, ascending in both columns.
///
/// A scaled request smaller than `size_threshold` gets `bucket_count`.
#[rustfmt::skip]
pub static SIZE_MAP: [(i32, i32); SIZE_MAP_LEN] = [
    (204, 211), (221, 223), (230, 233), (239, 239),
    (249, 251), (259, 263), (269, 269), (280, 281),
    (291, 293), (303, 307), (315, 317), (328, 331),
    (341, 347), (354, 359), (368, 373), (747, 383),
    (1514, 389), (6214, 397), (6462, 409), (6721, 421),
    (6990, 439), (7269, 457), (7560, 479), (7863, 499),
    (8177, 521), (8504, 541), (8845, 557), (9198, 577),
    (9566, 599), (9949, 631), (10347, 647), (10761, 673),
    (11191, 701), (11639, 733), (12105, 757), (12589, 787),
    (13092, 821), (13616, 853), (14161, 887), (14727, 929),
    (15316, 967), (15929, 997), (16566, 1039), (17229, 1087),
    (17918, 1123), (18635, 1171), (19380, 1213), (20155, 1277),
    (20962, 1319), (21800, 1367), (22672, 1423), (23579, 1481),
    (24522, 1543), (25503, 1597), (26523, 1663), (27584, 1733),
    (28688, 1801), (29835, 1867), (31028, 1949), (32270, 2017),
    (33560, 2099), (34903, 2203), (36299, 2269), (37751, 2371),
    (39261, 2459), (40831, 2557), (42465, 2657), (44163, 2767),
    (45930, 2879), (47767, 2999), (49678, 3109), (51665, 3251),
    (53732, 3359), (55881, 3499), (58116, 3637), (60441, 3779),
    (62858, 3929), (65373, 4091), (67988, 4253), (70707, 4421),
    (73536, 4597), (76477, 4783), (79536, 4973), (82718, 5171),
    (86026, 5381), (89467, 5623), (93046, 5821), (96768, 6053),
    (100639, 6299), (104664, 6547), (108851, 6823), (113205, 7079),
    (117733, 7369), (122442, 7669), (127340, 7963), (132434, 8287),
    (137731, 8609), (143240, 8963), (148970, 9311), (154929, 9689),
    (161126, 10079), (167571, 10477), (174274, 10903), (181245, 11329),
    (188495, 11783), (196035, 12253), (203876, 12743), (212031, 13259),
    (220512, 13789), (229333, 14341), (238506, 14923), (248046, 15511),
    (257968, 16127), (268287, 16787), (279019, 17443), (290179, 18143),
    (301787, 18869), (313858, 19661), (326412, 20407), (339469, 21221),
    (353048, 22067), (367170, 22961), (381856, 23869), (397131, 24821),
    (413016, 25819), (429537, 26849), (446718, 27941), (464587, 29059),
    (483170, 30203), (502497, 31469), (522597, 32687), (543501, 33997),
    (565241, 35339), (587851, 36749), (611365, 38219), (635819, 39749),
    (661252, 41333), (687702, 42989), (715210, 44701), (743819, 46489),
    (773572, 48353), (804515, 50287), (836695, 52301), (870163, 54401),
    (904969, 56569), (941168, 58831), (978815, 61211), (1017968, 63629),
    (1058686, 66169), (1101034, 68819), (1145075, 71569), (1190878, 74441),
    (1238513, 77417), (1288054, 80513), (1339576, 83737), (1393159, 87083),
    (1448886, 90583), (1506841, 94201), (1567115, 97961), (1629799, 101863),
    (1694991, 105943), (1762791, 110183), (1833303, 114593), (1906635, 119173),
    (1982900, 123941), (2062216, 128903), (2144705, 134047), (2230493, 139409),
    (2319713, 144983), (2412501, 150791), (2509001, 156817), (2609362, 163109),
    (2713736, 169627), (2822285, 176401), (2935177, 183451), (3052584, 190787),
    (3174687, 198427), (3301675, 206369), (3433742, 214631), (3571092, 223207),
    (3713935, 232129), (3862493, 241421), (4016992, 251063), (4177672, 261127),
    (4344779, 271549), (4518570, 282413), (4699313, 293717), (4887286, 305471),
    (5082777, 317693), (5286088, 330383), (5497532, 343601), (5717433, 357347),
    (5946130, 371639), (6183976, 386501), (6431335, 401959), (6688588, 418043),
    (6956132, 434761), (7234377, 452159), (7523752, 470243), (7824702, 489053),
    (8137690, 508619), (8463198, 528967), (8801726, 550111), (9153795, 572137),
    (9519947, 595003), (9900744, 618799), (10296774, 643553), (10708645, 669301),
    (11136991, 696067), (11582471, 723907), (12045770, 752861), (12527600, 782981),
    (13028704, 814309), (13549853, 846869), (14091847, 880751), (14655521, 915973),
    (15241741, 952619), (15851411, 990719), (16485468, 1030349), (17144886, 1071563),
    (17830682, 1114423), (18543909, 1159001), (19285665, 1205377), (20057092, 1253587),
    (20859376, 1303711), (21693751, 1355863), (22561501, 1410103), (23463961, 1466519),
    (24402519, 1525163), (25378620, 1586191), (26393765, 1649611), (27449516, 1715599),
    (28547496, 1784227), (29689396, 1855589), (30876972, 1929821), (32112051, 2007011),
    (33396533, 2087287), (34732394, 2170783), (36121690, 2257609), (37566558, 2347931),
    (39069220, 2441843), (40631989, 2539513), (42257269, 2641099), (43947559, 2746739),
    (45705462, 2856599), (47533680, 2970857), (49435027, 3089693), (51412429, 3213277),
    (53468926, 3341813), (55607683, 3475489), (57831990, 3614509), (60145270, 3759101),
    (62551081, 3909463), (65053124, 4065821), (67655249, 4228457), (70361459, 4397599),
    (73175917, 4573519), (76102954, 4756439), (79147072, 4946713), (82312955, 5144561),
    (85605473, 5350349), (89029692, 5564381), (92590880, 5786947), (96294515, 6018427),
    (100146296, 6259153), (104152147, 6509527), (108318233, 6769897), (112650963, 7040687),
    (117157001, 7322351), (121843281, 7615207), (126717012, 7919851), (131785693, 8236637),
    (137057121, 8566109), (142539406, 8908721), (148240982, 9265073), (154170621, 9635669),
    (160337446, 10021093), (166750944, 10421947), (173420982, 10838813), (180357821, 11272367),
    (187572134, 11723263), (195075019, 12192197), (202878020, 12679903), (210993141, 13187081),
    (219432866, 13714559), (228210181, 14263141), (237338588, 14833669), (246832132, 15427019),
    (256705417, 16044089), (266973634, 16685861), (277652579, 17353307), (288758682, 18047423),
    (300309030, 18769319), (312321391, 19520089), (324814247, 20300947), (337806817, 21112951),
    (351319089, 21957473), (365371853, 22835753), (379986727, 23749171), (395186196, 24699139),
    (410993644, 25687111), (427433390, 26714587), (444530725, 27783179), (462311954, 28894501),
    (480804433, 30050281), (500036610, 31252289), (520038074, 32502389), (540839597, 33802519),
    (562473181, 35154577), (584972108, 36560767), (608370993, 38023189), (632705832, 39544123),
    (658014066, 41125939), (684334628, 42770921), (711708014, 44481751), (740176334, 46261037),
    (769783388, 48111463), (800574723, 50035927), (832597712, 52037383), (865901621, 54118861),
    (900537685, 56283653), (936559193, 58534967), (974021561, 60876367), (1012982423, 63311411),
    (1053501720, 65843867), (1095641789, 68477623), (1139467460, 71216741), (1185046159, 74065399),
    (1232448005, 77028013), (1281745925, 80109131), (1333015762, 83313493), (1386336393, 86646029),
    (1441789849, 90111899), (1499461443, 93716351), (1559439900, 97465009), (1621817496, 101363611),
    (1686690196, 105418147), (1754157804, 109634869), (1824324116, 114020267), (1897297081, 118581079),
    (1973188964, 123324329), (2052116523, 128257289), (2134201184, 133387669), (2147483647, 134217757),
];

const SIZE_MAP_LEN: usize = 344;

/// Recommends a bucket count for a hash table expected to hold about
/// `desired_size` entries.
///
/// The result is non-decreasing in `desired_size`. Sizes whose scaled value
/// does not fit in an `i32` get the largest entry of [`SIZE_MAP`].
///
/// ```rust
/// use cachestat::sizing::estimate_bucket_count;
///
/// assert_eq!(estimate_bucket_count(50), 71);
/// ```
pub fn estimate_bucket_count(desired_size: i32) -> i32 {
    match scale(desired_size) {
        Some(scaled) if scaled < SMALL_LIMIT => next_prime_above(scaled),
        Some(scaled) => SIZE_MAP
            .iter()
            .find(|&&(threshold, _)| threshold > scaled)
            .map_or_else(largest_bucket_count, |&(_, buckets)| buckets),
        None => largest_bucket_count(),
    }
}

/// `round(desired × SCALE)`, or `None` if that leaves the `i32` range.
#[allow(clippy::cast_possible_truncation)]
fn scale(desired_size: i32) -> Option<i32> {
    let scaled = (f64::from(desired_size) * SCALE).round();
    if scaled > f64::from(i32::MAX) || scaled < f64::from(i32::MIN) {
        None
    } else {
        Some(scaled as i32)
    }
}

fn next_prime_above(n: i32) -> i32 {
    PRIMES
        .iter()
        .copied()
        .find(|&p| p > n)
        .unwrap_or(PRIMES[PRIMES.len() - 1])
}

fn largest_bucket_count() -> i32 {
    SIZE_MAP[SIZE_MAP_LEN - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_strictly_ascending() {
        assert!(PRIMES.windows(2).all(|w| w[0] < w[1]));
        assert!(SIZE_MAP.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));
        assert_eq!(SIZE_MAP[SIZE_MAP_LEN - 1].0, i32::MAX);
    }

    #[test]
    fn small_sizes_use_the_next_prime() {
        assert_eq!(estimate_bucket_count(50), 71);
        assert_eq!(estimate_bucket_count(0), 3);
        assert_eq!(estimate_bucket_count(1), 3);
        assert_eq!(estimate_bucket_count(10), 17);
        // 152 × 1.29 = 196.08
        assert_eq!(estimate_bucket_count(152), 197);
    }

    #[test]
    fn negative_sizes_get_the_smallest_prime() {
        assert_eq!(estimate_bucket_count(-5), 3);
        assert_eq!(estimate_bucket_count(i32::MIN), 3);
    }

    #[test]
    fn crossing_into_the_size_map_does_not_shrink() {
        let below = estimate_bucket_count(152);
        let above = estimate_bucket_count(153);
        assert!(above >= below, "{above} < {below}");
        assert_eq!(above, 211);
    }

    #[test]
    fn large_sizes_start_below_the_request() {
        // 1_000_000 × 1.29 = 1_290_000, four doublings away from the entry.
        let buckets = estimate_bucket_count(1_000_000);
        assert!(buckets < 1_000_000);
        assert!(buckets * 16 > 1_000_000);
    }

    #[test]
    fn overflow_saturates_to_the_largest_entry() {
        assert_eq!(estimate_bucket_count(i32::MAX), largest_bucket_count());
        assert_eq!(largest_bucket_count(), 134_217_757);
    }

    #[test]
    fn monotonic_over_a_sweep() {
        let mut last = estimate_bucket_count(-1);
        let mut size = 0_i64;
        while size < i64::from(i32::MAX) {
            let current = estimate_bucket_count(i32::try_from(size).unwrap());
            assert!(current >= last, "estimate({size}) = {current} < {last}");
            last = current;
            size = size * 9 / 8 + 1;
        }
    }
}
