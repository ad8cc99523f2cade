//! Conversion laws checked over randomly generated paths.

use assertables::assert_in_delta;
use itertools::{izip, Itertools};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use svgpathops::{
    normalize, optimize, path_bbox, path_length, reverse_path, round_path, to_absolute,
    to_curve, to_relative, transform_path, Components, PathArray, ReverseMode, TransformSpec,
};

const ALL_COMMANDS: &[char] = &[
    'M', 'L', 'H', 'V', 'C', 'S', 'Q', 'T', 'A', 'Z', 'm', 'l', 'h', 'v', 'c', 's', 'q', 't',
    'a', 'z',
];

const SEEDS: std::ops::Range<u64> = 0..200;

/// Swap S/T for C/Q unless they follow a curve of the same family, so the
/// shorthand always reflects an explicit control point.
fn shorthand_in_chain(cmd: char, prev: char) -> char {
    let full = match (cmd.to_ascii_lowercase(), prev) {
        ('s', 'c' | 's') | ('t', 'q' | 't') => return cmd,
        ('s', _) => 'c',
        ('t', _) => 'q',
        _ => return cmd,
    };
    if cmd.is_ascii_uppercase() {
        full.to_ascii_uppercase()
    } else {
        full
    }
}

fn random_path(rng: &mut Pcg32, commands: &[char], chained: bool) -> String {
    let (x, y): (i32, i32) = (rng.random_range(-50..=50), rng.random_range(-50..=50));
    let mut parts = vec![format!("M{x} {y}")];

    let mut prev = 'm';
    for _ in 0..rng.random_range(1..12) {
        let cmd = commands[rng.random_range(0..commands.len())];
        let cmd = if chained {
            shorthand_in_chain(cmd, prev)
        } else {
            cmd
        };
        prev = cmd.to_ascii_lowercase();
        let params: Vec<String> = match cmd.to_ascii_lowercase() {
            'a' => {
                let rx: i32 = rng.random_range(1..20);
                let ry = rng.random_range(1..20);
                let angle = rng.random_range(0..90);
                let large = rng.random_range(0..2);
                let sweep = rng.random_range(0..2);
                let x = rng.random_range(-50..=50);
                let y = rng.random_range(-50..=50);
                [rx, ry, angle, large, sweep, x, y]
                    .iter()
                    .map(|v| v.to_string())
                    .collect()
            }
            'z' => vec![],
            c => {
                let count = match c {
                    'h' | 'v' => 1,
                    'l' | 'm' | 't' => 2,
                    'q' | 's' => 4,
                    _ => 6,
                };
                (0..count)
                    .map(|_| rng.random_range(-50..=50i32).to_string())
                    .collect()
            }
        };
        parts.push(format!("{cmd}{}", params.join(" ")));
    }
    parts.join(" ")
}

fn paths(commands: &'static [char]) -> impl Iterator<Item = String> {
    SEEDS.map(move |seed| random_path(&mut Pcg32::seed_from_u64(seed), commands, false))
}

fn chained_paths(commands: &'static [char]) -> impl Iterator<Item = String> {
    SEEDS.map(move |seed| random_path(&mut Pcg32::seed_from_u64(seed), commands, true))
}

fn assert_close(a: &PathArray, b: &PathArray, context: &str) {
    assert_eq!(a.len(), b.len(), "Failed for path: {context}");
    for (sa, sb) in a.iter().zip_eq(b.iter()) {
        assert_eq!(sa.cmd, sb.cmd, "Failed for path: {context}");
        for (pa, pb) in sa.params.iter().zip_eq(sb.params.iter()) {
            assert_in_delta!(*pa, *pb, 1e-9);
        }
    }
}

#[test]
fn test_relative_round_trip() {
    for pd in paths(ALL_COMMANDS) {
        let abs = to_absolute(&pd).unwrap();
        let round_trip = to_absolute(&to_relative(&pd).unwrap()).unwrap();
        assert_close(&round_trip, &abs, &pd);
    }
}

#[test]
fn test_conversion_predicates() {
    for pd in paths(ALL_COMMANDS) {
        assert!(to_absolute(&pd).unwrap().is_absolute(), "Failed for path: {pd}");
        assert!(to_relative(&pd).unwrap().is_relative(), "Failed for path: {pd}");
        assert!(normalize(&pd).unwrap().is_normalized(), "Failed for path: {pd}");
        assert!(to_curve(&pd).unwrap().is_curve(), "Failed for path: {pd}");
    }
}

#[test]
fn test_reverse_twice() {
    let commands = &[
        'L', 'H', 'V', 'C', 'S', 'Q', 'T', 'A', 'l', 'h', 'v', 'c', 's', 'q', 't', 'a',
    ];
    for (i, pd) in chained_paths(commands).enumerate() {
        // close every other path
        let pd = if i % 2 == 0 { pd } else { pd + "Z" };
        let abs = to_absolute(&pd).unwrap();
        let once = reverse_path(&pd, ReverseMode::Whole).unwrap();
        let twice = reverse_path(&once, ReverseMode::Whole).unwrap();
        assert_eq!(twice, abs, "Failed for path: {pd}");
    }
}

#[test]
fn test_optimize_picks_shorter() {
    for pd in paths(ALL_COMMANDS) {
        let opt = optimize(&pd, Some(4)).unwrap();
        let abs = round_path(&to_absolute(&pd).unwrap(), Some(4)).unwrap();
        let rel = round_path(&to_relative(&pd).unwrap(), Some(4)).unwrap();
        assert_eq!(opt.len(), abs.len());

        for (o, a, r) in izip!(opt.iter(), abs.iter(), rel.iter()).skip(1) {
            let (o, a, r) = (o.to_string(), a.to_string(), r.to_string());
            assert!(o == a || o == r, "Failed for path: {pd}");
            assert!(o.len() <= a.len().min(r.len()), "Failed for path: {pd}");
        }
    }
}

#[test]
fn test_translation_invariants() {
    let spec = TransformSpec {
        translate: Some(Components::List(vec![7., -3.])),
        ..Default::default()
    };
    for pd in paths(ALL_COMMANDS) {
        let moved = transform_path(&pd, &spec).unwrap();

        let len = path_length(&pd).unwrap();
        assert_in_delta!(path_length(&moved).unwrap(), len, 1e-6 * (1. + len));

        let bb = path_bbox(&pd).unwrap();
        let moved_bb = path_bbox(&moved).unwrap();
        assert_in_delta!(moved_bb.x, bb.x + 7., 1e-6);
        assert_in_delta!(moved_bb.y, bb.y - 3., 1e-6);
        assert_in_delta!(moved_bb.width, bb.width, 1e-6);
        assert_in_delta!(moved_bb.height, bb.height, 1e-6);
    }
}
