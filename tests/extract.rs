use lean_extractor::api::{Api, ApiResult, Circuit};
use lean_extractor::record::{Record, RecordField};
use lean_extractor::{export, Config, Error, FieldId, Variable};

mod circuits;
use self::circuits::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn sum_equals_output() {
    init();
    let out = export::circuit_to_lean(&mut MyCircuit::default(), FieldId::Bn254).unwrap();
    assert_eq!(count(&out, "∃"), 1);
    assert!(out.contains("    Gates.eq gate_0 out ∧\n"));
    assert!(out.contains("def circuit (in_1: F) (in_2: F) (out: F): Prop :=\n"));
    assert!(out.ends_with("    True\n\nend MyCircuit"));
}

#[test]
fn merkle_hash_defined_once() {
    init();
    let out = export::circuit_to_lean(&mut MerkleRecover::new(3), FieldId::Bn254).unwrap();
    assert_eq!(count(&out, "def Hash "), 1);
    assert_eq!(count(&out, "    Hash "), 6);
    assert!(out.find("def Hash").unwrap() < out.find("def circuit").unwrap());
}

#[test]
fn bits_collapse_to_gate() {
    init();
    let out = export::circuit_to_lean(&mut BitsRoundTrip::default(), FieldId::Bn254).unwrap();
    assert!(out.contains("    ∃gate_1, gate_1 = Gates.from_binary gate_0 ∧\n"));
    assert!(!out.contains("vec!["));
}

#[test]
fn deterministic() {
    let a = export::circuit_to_lean(&mut Vectors::default(), FieldId::Bn254).unwrap();
    let b = export::circuit_to_lean(&mut Vectors::default(), FieldId::Bn254).unwrap();
    assert_eq!(a, b);
}

#[test]
fn shape_sensitive_names() {
    let out = export::circuit_to_lean(&mut TwoSums::default(), FieldId::Bn254).unwrap();
    assert_eq!(count(&out, "def Sum_3 "), 1);
    assert_eq!(count(&out, "def Sum_2 "), 1);
    assert_eq!(count(&out, "    Sum_3 a fun"), 2);
}

#[test]
fn namespace_override() {
    let out = export::circuit_to_lean_with_name(
        &mut MyCircuit::default(),
        FieldId::Bn254,
        "My Proofs",
    ).unwrap();
    assert!(out.contains("\nnamespace MyProofs\n"));
    assert!(out.ends_with("end MyProofs"));
}

#[test]
fn field_modulus_in_prelude() {
    let out = export::circuit_to_lean(&mut MyCircuit::default(), FieldId::Bls12_381).unwrap();
    assert!(out.contains(
        "def Order : ℕ := 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001\n",
    ));
}

#[test]
fn options_from_config() {
    let config = Config::from_yaml("field: bn254\noptions: []\n").unwrap();
    let out = config.circuit_to_lean(&mut MyCircuit::default()).unwrap();
    assert!(!out.contains("set_option"));
    assert!(out.contains("import ProvenZk.Ext.Vector\n\nnamespace MyCircuit\n"));
}

#[test]
fn gadget_file() {
    let out = export::gadget_to_lean(
        &ToBits { x: Variable::Nil, width: 4 },
        FieldId::Bn254,
    ).unwrap();
    assert!(out.contains("\nnamespace ToBits\n"));
    assert!(out.contains(
        "def ToBits_4 (x: F) (k: Vector F 4 -> Prop): Prop :=\n    ∃gate_0, Gates.to_binary x 4 gate_0 ∧\n    k gate_0",
    ));
    assert!(!out.contains("def circuit"));
}

#[test]
fn batch_circuits_dedupe() {
    init();
    let mut c2 = MerkleRecover::new(2);
    let mut c3 = MerkleRecover::new(3);
    let mut c2_again = MerkleRecover::new(2);
    let out = export::extract_circuits("Merkle", FieldId::Bn254, &mut [
        &mut c2 as &mut dyn Circuit,
        &mut c3 as &mut dyn Circuit,
        &mut c2_again as &mut dyn Circuit,
    ]).unwrap();
    assert_eq!(count(&out, "def Hash "), 1);
    assert_eq!(count(&out, "def MerkleRecover_2_2 "), 1);
    assert_eq!(count(&out, "def MerkleRecover_3_3 "), 1);
    assert!(!out.contains("def circuit"));
    // Each definition refers to its own inputs, not to another circuit's trace.
    assert!(out.contains(
        "def MerkleRecover_3_3 (root: F) (element: F) (path: Vector F 3) (proof: Vector F 3): Prop :=\n    Hash element proof[0] fun gate_0 =>\n",
    ));
}

#[derive(Default, Record)]
struct NegativeWidth {
    pub x: Variable,
}

impl Circuit for NegativeWidth {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        api.to_binary(self.x.clone(), Some(-2))?;
        Ok(())
    }
}

#[test]
fn errors_propagate() {
    let r = export::circuit_to_lean(&mut NegativeWidth::default(), FieldId::Bn254);
    assert_eq!(r, Err(Error::InvalidBitWidth(-2)));
}

#[derive(Default, Record)]
struct Ragged {
    pub rows: Vec<Vec<Variable>>,
}

impl Circuit for Ragged {
    fn define(&self, _api: &mut dyn Api) -> ApiResult<()> {
        Ok(())
    }
}

#[test]
fn ragged_rows_rejected() {
    let mut c = Ragged { rows: vec![vec![Variable::Nil; 2], vec![Variable::Nil; 1]] };
    match export::circuit_to_lean(&mut c, FieldId::Bn254) {
        Err(Error::SchemaMismatch { ref field, .. }) if field == "rows" => {},
        r => panic!("expected SchemaMismatch, got {:?}", r),
    }
}

#[derive(Default, Record)]
struct Panicking {
    pub xs: Vec<Variable>,
}

impl Circuit for Panicking {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        // Out of bounds: `xs` is empty.
        api.assert_is_boolean(self.xs[3].clone())
    }
}

#[test]
fn panics_are_caught() {
    match export::circuit_to_lean(&mut Panicking::default(), FieldId::Bn254) {
        Err(Error::ExtractionPanic(msg)) => assert!(msg.contains("index out of bounds")),
        r => panic!("expected ExtractionPanic, got {:?}", r),
    }
}

#[derive(Default, Record)]
struct Scaled {
    pub a: Variable,
    scale: u32,
}

impl Circuit for Scaled {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        let x = api.mul(self.a.clone(), Variable::from(self.scale), &[])?;
        api.assert_is_boolean(x)
    }
}

#[test]
fn private_fields_are_not_arguments() {
    let out = export::circuit_to_lean(&mut Scaled { scale: 3, ..Scaled::default() }, FieldId::Bn254)
        .unwrap();
    assert!(out.contains(concat!(
        "def circuit (a: F): Prop :=\n",
        "    ∃gate_0, gate_0 = Gates.mul a (3:F) ∧\n",
        "    Gates.is_bool gate_0 ∧\n",
        "    True",
    )));
}

#[derive(Default, Record)]
struct AllOps {
    pub a: Variable,
    pub b: Variable,
    pub c: Variable,
}

impl Circuit for AllOps {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        let (a, b, c) = (self.a.clone(), self.b.clone(), self.c.clone());
        api.add(a.clone(), b.clone(), &[])?;
        api.mul_acc(a.clone(), b.clone(), c.clone())?;
        api.neg(a.clone())?;
        api.sub(a.clone(), b.clone(), &[])?;
        api.mul(a.clone(), b.clone(), &[])?;
        api.div(a.clone(), b.clone())?;
        api.div_unchecked(a.clone(), b.clone())?;
        api.inverse(a.clone())?;
        let bits = api.to_binary(a.clone(), Some(2))?;
        api.from_binary(bits)?;
        api.xor(a.clone(), b.clone())?;
        api.or(a.clone(), b.clone())?;
        api.and(a.clone(), b.clone())?;
        api.select(a.clone(), b.clone(), c.clone())?;
        api.lookup2(a.clone(), b.clone(), 1.into(), 2.into(), 3.into(), 4.into())?;
        api.is_zero(a.clone())?;
        api.cmp(a.clone(), b.clone())?;
        api.assert_is_equal(a.clone(), b.clone())?;
        api.assert_is_different(a.clone(), b)?;
        api.assert_is_boolean(a.clone())?;
        api.assert_is_less_or_equal(a, c)
    }
}

#[test]
fn every_op_renders() {
    let out = export::circuit_to_lean(&mut AllOps::default(), FieldId::Bn254).unwrap();
    let expected = concat!(
        "def circuit (a: F) (b: F) (c: F): Prop :=\n",
        "    ∃_ignored_, _ignored_ = Gates.add a b ∧\n",
        "    ∃_ignored_, _ignored_ = Gates.mul_acc a b c ∧\n",
        "    ∃_ignored_, _ignored_ = Gates.neg a ∧\n",
        "    ∃_ignored_, _ignored_ = Gates.sub a b ∧\n",
        "    ∃_ignored_, _ignored_ = Gates.mul a b ∧\n",
        "    ∃_ignored_, Gates.div a b _ignored_ ∧\n",
        "    ∃_ignored_, Gates.div_unchecked a b _ignored_ ∧\n",
        "    ∃_ignored_, Gates.inv a _ignored_ ∧\n",
        "    ∃gate_8, Gates.to_binary a 2 gate_8 ∧\n",
        "    ∃_ignored_, _ignored_ = Gates.from_binary gate_8 ∧\n",
        "    ∃_ignored_, Gates.xor a b _ignored_ ∧\n",
        "    ∃_ignored_, Gates.or a b _ignored_ ∧\n",
        "    ∃_ignored_, Gates.and a b _ignored_ ∧\n",
        "    ∃_ignored_, Gates.select a b c _ignored_ ∧\n",
        "    ∃_ignored_, Gates.lookup a b (1:F) (2:F) (3:F) (4:F) _ignored_ ∧\n",
        "    ∃_ignored_, Gates.is_zero a _ignored_ ∧\n",
        "    ∃_ignored_, Gates.cmp a b _ignored_ ∧\n",
        "    Gates.eq a b ∧\n",
        "    Gates.ne a b ∧\n",
        "    Gates.is_bool a ∧\n",
        "    Gates.le a c ∧\n",
        "    True",
    );
    assert!(out.contains(expected), "unexpected output:\n{}", out);
}
