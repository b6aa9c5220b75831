use dashu::integer::IBig;
use proptest::prelude::*;
use wicket::dd::DoubleDescription;
use wicket::prelude::*;
use wicket_core::linalg;
use wicket_core::num;
use wicket_core::{BitSet, WordSet};

fn problem(rows: &[&[i64]], signs: &[VarSign], relations: &[Relation]) -> Problem<i64> {
    let matrix = Matrix::from_rows(signs.len(), rows.iter().map(|r| r.to_vec())).expect("matrix");
    Problem::new(matrix)
        .with_signs(signs.to_vec())
        .expect("signs")
        .with_relations(relations.to_vec())
        .expect("relations")
}

fn run(p: &Problem<i64>) -> ConeOutput<i64> {
    enumerate(p, &ConeOptions::default()).expect("enumerate")
}

fn generators(out: &ConeOutput<i64>) -> (Vec<Vec<i64>>, Vec<Vec<i64>>, Vec<Vec<i64>>) {
    (
        out.rays().to_vec(),
        out.circuits().to_vec(),
        out.subspace().to_vec(),
    )
}

const NN: VarSign = VarSign::NonNegative;
const FREE: VarSign = VarSign::Free;
const GE: Relation = Relation::Greater;

#[test]
fn orthant_yields_unit_vectors() {
    let out = run(&Problem::orthant(4));
    let mut expected: Vec<Vec<i64>> = (0..4)
        .map(|i| (0..4).map(|j| i64::from(i == j)).collect())
        .collect();
    expected.sort();
    assert_eq!(out.rays(), expected.as_slice());
    assert!(out.circuits().is_empty());
    assert!(out.subspace().is_empty());
}

#[test]
fn wide_orthant_uses_multi_word_supports() {
    let out = run(&Problem::orthant(70));
    assert_eq!(out.rays().len(), 70);
    assert!(out.rays().iter().all(|r| r.iter().sum::<i64>() == 1));
}

#[test]
fn degenerate_equality_is_a_line() {
    let p = problem(&[&[1, -1]], &[FREE, FREE], &[Relation::Equal]);
    let out = run(&p);
    assert!(out.rays().is_empty());
    assert!(out.circuits().is_empty());
    assert_eq!(out.subspace(), &[vec![1, 1]]);
}

#[test]
fn wedge_rays() {
    let p = problem(&[&[1, -1]], &[NN, NN], &[GE]);
    let out = run(&p);
    assert_eq!(out.rays(), &[vec![1, 0], vec![1, 1]]);
    assert!(out.subspace().is_empty());
}

#[test]
fn infeasible_cone_is_empty() {
    let p = problem(&[&[-1, -1]], &[NN, NN], &[GE]);
    let (rays, circuits, subspace) = generators(&run(&p));
    assert!(rays.is_empty());
    assert!(circuits.is_empty());
    assert!(subspace.is_empty());
}

#[test]
fn less_than_rows_and_non_positive_columns() {
    // x ≤ 0, y ≥ 0, x + y ≤ 0  ⇔  the wedge between (−1,0) and (−1,1).
    let p = problem(
        &[&[1, 1]],
        &[VarSign::NonPositive, NN],
        &[Relation::Less],
    );
    let out = run(&p);
    assert_eq!(out.rays(), &[vec![-1, 0], vec![-1, 1]]);
}

#[test]
fn half_plane_keeps_its_line() {
    let p = problem(&[], &[NN, FREE], &[]);
    let out = run(&p);
    assert_eq!(out.rays(), &[vec![1, 0]]);
    assert_eq!(out.subspace(), &[vec![0, 1]]);
}

#[test]
fn free_variables_without_inequalities() {
    let p = problem(&[&[1, 1, 1]], &[FREE, FREE, FREE], &[Relation::Equal]);
    let out = run(&p);
    assert!(out.rays().is_empty());
    assert_eq!(out.subspace().len(), 2);
    for v in out.subspace() {
        assert_eq!(v.iter().sum::<i64>(), 0);
    }
}

#[test]
fn circuits_of_a_single_row() {
    let circuit = VarSign::Circuit;
    let p = problem(&[&[1, 1, 1]], &[circuit; 3], &[Relation::Equal]);
    let out = run(&p);
    assert!(out.rays().is_empty());
    assert!(out.subspace().is_empty());
    let mut expected = vec![
        vec![1, -1, 0],
        vec![-1, 1, 0],
        vec![1, 0, -1],
        vec![-1, 0, 1],
        vec![0, 1, -1],
        vec![0, -1, 1],
    ];
    expected.sort();
    assert_eq!(out.circuits(), expected.as_slice());
    assert_eq!(
        out.circuit_classes().unwrap(),
        vec![vec![0, 1, -1], vec![1, -1, 0], vec![1, 0, -1]]
    );
    assert_eq!(out.homogeneous().len(), 6);
}

#[test]
fn circuits_beside_a_non_negative_column() {
    // x1 − x2 + x3 = 0 with x3 ≥ 0 and x1, x2 of either sign.
    let circuit = VarSign::Circuit;
    let p = problem(&[&[1, -1, 1]], &[circuit, circuit, NN], &[Relation::Equal]);
    let out = run(&p);
    assert_eq!(
        out.circuits(),
        &[vec![-1, 0, 1], vec![-1, -1, 0], vec![0, 1, 1], vec![1, 1, 0]]
            .iter()
            .cloned()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>()
    );
    assert!(out.rays().is_empty());
}

fn square_cone() -> Problem<i64> {
    problem(
        &[&[-1, 0, 1], &[1, 0, 1], &[0, -1, 1], &[0, 1, 1]],
        &[FREE; 3],
        &[GE; 4],
    )
}

#[test]
fn cone_over_a_square() {
    let out = run(&square_cone());
    assert_eq!(
        out.rays(),
        &[vec![-1, -1, 1], vec![-1, 1, 1], vec![1, -1, 1], vec![1, 1, 1]]
    );
    assert_eq!(out.dimension().unwrap(), 3);
}

fn pyramid_cone() -> Problem<i64> {
    // Homogenised square pyramid (x, y, z, t): apex (0,0,1,1) lies on four facets.
    problem(
        &[
            &[0, 0, 1, 0],
            &[-1, 0, -1, 1],
            &[1, 0, -1, 1],
            &[0, -1, -1, 1],
            &[0, 1, -1, 1],
        ],
        &[FREE; 4],
        &[GE; 5],
    )
}

#[test]
fn degenerate_apex() {
    let out = run(&pyramid_cone());
    assert_eq!(
        out.rays(),
        &[
            vec![-1, -1, 0, 1],
            vec![-1, 1, 0, 1],
            vec![0, 0, 1, 1],
            vec![1, -1, 0, 1],
            vec![1, 1, 0, 1],
        ]
    );
}

#[test]
fn redundant_constraints_are_counted() {
    let p = problem(&[&[1, 1]], &[NN, NN], &[GE]);
    let out = run(&p);
    assert_eq!(out.rays(), &[vec![0, 1], vec![1, 0]]);
    assert_eq!(out.stats().redundant_constraints, 1);
    assert_eq!(out.stats().pivots, 2);
    assert_eq!(out.stats().constraints_processed, 3);
}

/// Deterministic pseudo-random cone: non-negative variables cut by `rows` inequalities.
fn scrambled_cone(seed: u64, vars: usize, rows: usize) -> Problem<i64> {
    let mut state = seed;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) % 7) as i64 - 3
    };
    let matrix: Vec<Vec<i64>> = (0..rows).map(|_| (0..vars).map(|_| next()).collect()).collect();
    let refs: Vec<&[i64]> = matrix.iter().map(Vec::as_slice).collect();
    problem(&refs, &vec![NN; vars], &vec![GE; rows])
}

fn all_configurations() -> Vec<ConeOptions> {
    let mut out = Vec::new();
    for order in ConstraintOrder::ALL {
        for adjacency in [AdjacencyTest::Tree, AdjacencyTest::Matrix] {
            for (threads, chunk) in [(1, 16), (3, 1)] {
                out.push(
                    ConeOptions::builder()
                        .order(order)
                        .adjacency(adjacency)
                        .threads(threads)
                        .chunk_size(chunk)
                        .build(),
                );
            }
        }
    }
    out
}

/// Scrambled cones whose enumeration needs the exact face test.
const DEGENERATE_SEEDS: [(u64, usize, usize); 2] = [(3, 6, 5), (5, 6, 6)];

#[test]
fn output_is_independent_of_configuration() {
    for (seed, vars, rows) in DEGENERATE_SEEDS {
        let p = scrambled_cone(seed, vars, rows);
        let reference = run(&p);
        assert!(!reference.rays().is_empty(), "seed {seed} yields an empty cone");
        assert!(reference.stats().face_tests > 0, "seed {seed} never reaches the face test");
        for options in all_configurations() {
            let out = enumerate(&p, &options).expect("enumerate");
            assert_eq!(
                generators(&out),
                generators(&reference),
                "seed {seed} with {options:?}"
            );
        }
    }
    for p in [square_cone(), pyramid_cone()] {
        let reference = generators(&run(&p));
        for options in all_configurations() {
            assert_eq!(generators(&enumerate(&p, &options).unwrap()), reference);
        }
    }
}

#[test]
fn dominance_index_saves_face_tests() {
    let p = scrambled_cone(5, 6, 6);
    let with = |adjacency| {
        enumerate(&p, &ConeOptions::builder().adjacency(adjacency).build()).unwrap()
    };
    let tree = with(AdjacencyTest::Tree);
    let matrix = with(AdjacencyTest::Matrix);
    assert_eq!(generators(&tree), generators(&matrix));
    assert!(tree.stats().face_tests > 0);
    assert!(
        tree.stats().face_tests < matrix.stats().face_tests,
        "tree {:?} vs matrix {:?}",
        tree.stats(),
        matrix.stats()
    );
}

#[test]
fn work_counters_do_not_depend_on_threads() {
    for (seed, vars, rows) in DEGENERATE_SEEDS {
        let p = scrambled_cone(seed, vars, rows);
        for order in ConstraintOrder::ALL {
            for adjacency in [AdjacencyTest::Tree, AdjacencyTest::Matrix] {
                let stats = |threads| {
                    let options = ConeOptions::builder()
                        .order(order)
                        .adjacency(adjacency)
                        .threads(threads)
                        .chunk_size(1)
                        .build();
                    *enumerate(&p, &options).unwrap().stats()
                };
                assert_eq!(stats(1), stats(4), "seed {seed}, {order:?}, {adjacency:?}");
            }
        }
    }
}

#[test]
fn rerunning_is_idempotent() {
    let p = scrambled_cone(3, 6, 5);
    assert_eq!(run(&p), run(&p));
}

#[test]
fn support_backings_agree() {
    let p = pyramid_cone();
    let cone = Cone::lift(&p).unwrap();
    let options = ConeOptions::default();
    let narrow = DoubleDescription::<i64, WordSet>::new(&cone, &options)
        .unwrap()
        .run()
        .unwrap();
    let wide = DoubleDescription::<i64, BitSet>::new(&cone, &options)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(generators(&narrow), generators(&wide));
}

#[test]
fn arbitrary_precision_matches_fixed_width() {
    let p = scrambled_cone(5, 6, 6);
    let big = Problem::new(
        Matrix::from_rows(
            p.var_count(),
            p.matrix()
                .rows()
                .map(|r| r.iter().map(|x| IBig::from(*x)).collect::<Vec<_>>()),
        )
        .unwrap(),
    )
    .with_signs(p.signs().to_vec())
    .unwrap()
    .with_relations(p.relations().to_vec())
    .unwrap();
    let small = run(&p);
    let large = enumerate(&big, &ConeOptions::default()).unwrap();
    let widen = |rows: &[Vec<i64>]| -> Vec<Vec<IBig>> {
        rows.iter()
            .map(|r| r.iter().map(|x| IBig::from(*x)).collect())
            .collect()
    };
    assert_eq!(large.rays(), widen(small.rays()).as_slice());
    assert_eq!(large.subspace(), widen(small.subspace()).as_slice());
}

#[test]
fn narrow_precision_reports_overflow() {
    let m = Matrix::from_rows(2, [vec![i32::MAX, 1], vec![1, i32::MAX]]).unwrap();
    let p = Problem::new(m);
    match enumerate(&p, &ConeOptions::default()) {
        Err(WicketError::Overflow { precision, .. }) => assert_eq!(precision, <i32 as Int>::NAME),
        other => panic!("expected overflow, got {other:?}"),
    }
}

/// Asserts that `ray` satisfies every constraint of `p`.
fn check_feasible(p: &Problem<i64>, ray: &[i64]) {
    for (j, sign) in p.signs().iter().enumerate() {
        match sign {
            VarSign::NonNegative => assert!(ray[j] >= 0, "{ray:?} violates x{j} ≥ 0"),
            VarSign::NonPositive => assert!(ray[j] <= 0, "{ray:?} violates x{j} ≤ 0"),
            VarSign::Free | VarSign::Circuit => {}
        }
    }
    for (row, rel) in p.matrix().rows().zip(p.relations()) {
        let s = num::dot(row, ray).unwrap();
        match rel {
            Relation::Greater => assert!(s >= 0, "{ray:?} violates {row:?} ≥ 0"),
            Relation::Less => assert!(s <= 0, "{ray:?} violates {row:?} ≤ 0"),
            Relation::Equal => assert_eq!(s, 0, "{ray:?} violates {row:?} = 0"),
        }
    }
}

/// Rank of the constraints tight on `ray` (equalities included).
fn tight_rank(p: &Problem<i64>, ray: &[i64]) -> usize {
    let n = p.var_count();
    let mut tight = Matrix::zeros(0, n);
    for (j, sign) in p.signs().iter().enumerate() {
        if *sign != VarSign::Free && ray[j] == 0 {
            let mut unit = vec![0; n];
            unit[j] = 1;
            tight.push_row(unit);
        }
    }
    for row in p.matrix().rows() {
        if num::dot(row, ray).unwrap() == 0 {
            tight.push_row(row.to_vec());
        }
    }
    linalg::rank(&tight).unwrap()
}

fn check_extreme(p: &Problem<i64>, out: &ConeOutput<i64>) {
    let n = p.var_count();
    let lineality = out.subspace().len();
    for circuit in out.circuits() {
        check_feasible(p, circuit);
    }
    for ray in out.rays() {
        check_feasible(p, ray);
        assert_eq!(tight_rank(p, ray), n - lineality - 1, "{ray:?} is not extreme");
    }
    for s in out.subspace() {
        assert_eq!(tight_rank(p, s), n - lineality, "{s:?} is not in the lineality space");
    }
}

#[test]
fn outputs_are_feasible_and_extreme() {
    for p in [square_cone(), pyramid_cone(), scrambled_cone(5, 6, 6)] {
        check_extreme(&p, &run(&p));
    }
}

fn arb_problem() -> impl Strategy<Value = Problem<i64>> {
    let sign = prop_oneof![
        3 => Just(NN),
        2 => Just(FREE),
        1 => Just(VarSign::NonPositive),
        2 => Just(VarSign::Circuit),
    ];
    let relation = prop_oneof![3 => Just(GE), 1 => Just(Relation::Less), 1 => Just(Relation::Equal)];
    (2usize..6, 1usize..6).prop_flat_map(move |(vars, rows)| {
        (
            prop::collection::vec(prop::collection::vec(-3i64..=3, vars), rows),
            prop::collection::vec(sign.clone(), vars),
            prop::collection::vec(relation.clone(), rows),
        )
            .prop_map(move |(matrix, signs, relations)| {
                let refs: Vec<&[i64]> = matrix.iter().map(Vec::as_slice).collect();
                problem(&refs, &signs, &relations)
            })
    })
}

/// Support-minimal kernel vectors of `a` in both directions, by trying every column subset.
fn brute_force_circuits(a: &Matrix<i64>) -> Vec<Vec<i64>> {
    let n = a.col_count();
    let rows: Vec<usize> = (0..a.row_count()).collect();
    let mut out = Vec::new();
    for mask in 1u32..(1 << n) {
        let cols: Vec<usize> = (0..n).filter(|&j| (mask >> j) & 1 == 1).collect();
        let kernel = linalg::kernel_basis(&a.select(&rows, &cols)).unwrap();
        let [v] = kernel.as_slice() else {
            continue;
        };
        if v.iter().any(|x| *x == 0) {
            continue;
        }
        let mut circuit = vec![0i64; n];
        for (&j, x) in cols.iter().zip(v) {
            circuit[j] = *x;
        }
        num::make_primitive(&mut circuit).unwrap();
        out.push(circuit.iter().map(|x| -x).collect());
        out.push(circuit);
    }
    out.sort();
    out.dedup();
    out
}

fn arb_kernel_problem() -> impl Strategy<Value = Problem<i64>> {
    (2usize..6, 1usize..4).prop_flat_map(|(vars, rows)| {
        prop::collection::vec(prop::collection::vec(-2i64..=2, vars), rows).prop_map(move |matrix| {
            let refs: Vec<&[i64]> = matrix.iter().map(Vec::as_slice).collect();
            problem(&refs, &vec![VarSign::Circuit; vars], &vec![Relation::Equal; refs.len()])
        })
    })
}

#[test]
fn circuits_match_column_subsets() {
    let p = problem(&[&[1, 2, 0, -1], &[0, 1, 1, 1]], &[VarSign::Circuit; 4], &[Relation::Equal; 2]);
    let out = run(&p);
    assert_eq!(out.circuits(), brute_force_circuits(p.matrix()).as_slice());
    assert_eq!(out.circuit_classes().unwrap().len() * 2, out.circuits().len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_cones_agree_across_configurations(p in arb_problem()) {
        let reference = run(&p);
        check_extreme(&p, &reference);
        for options in all_configurations() {
            let out = enumerate(&p, &options).unwrap();
            prop_assert_eq!(generators(&out), generators(&reference));
        }
    }

    #[test]
    fn circuits_are_support_minimal_kernel_vectors(p in arb_kernel_problem()) {
        let expected = brute_force_circuits(p.matrix());
        for options in all_configurations() {
            let out = enumerate(&p, &options).unwrap();
            prop_assert!(out.rays().is_empty());
            prop_assert!(out.subspace().is_empty());
            prop_assert_eq!(out.circuits(), expected.as_slice());
        }
    }
}
