//! Circuits and gadgets shared by the integration tests.
#![allow(dead_code)]

use lean_extractor::api::{self, Api, ApiResult, Circuit, GadgetDefinition};
use lean_extractor::record::{Record, RecordField};
use lean_extractor::Variable;

#[derive(Default, Record)]
pub struct MyCircuit {
    pub in_1: Variable,
    pub in_2: Variable,
    pub out: Variable,
}

impl Circuit for MyCircuit {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        let sum = api.add(self.in_1.clone(), self.in_2.clone(), &[])?;
        api.assert_is_equal(sum, self.out.clone())
    }
}


#[derive(Clone, Default, Record)]
pub struct Hash {
    pub in_1: Variable,
    pub in_2: Variable,
}

impl GadgetDefinition for Hash {
    fn define_gadget(&self, api: &mut dyn Api) -> ApiResult {
        api.mul(self.in_1.clone(), self.in_2.clone(), &[])
    }
}

#[derive(Default, Record)]
pub struct MerkleRecover {
    pub root: Variable,
    pub element: Variable,
    pub path: Vec<Variable>,
    pub proof: Vec<Variable>,
}

impl MerkleRecover {
    pub fn new(depth: usize) -> MerkleRecover {
        MerkleRecover {
            path: vec![Variable::Nil; depth],
            proof: vec![Variable::Nil; depth],
            ..MerkleRecover::default()
        }
    }
}

impl Circuit for MerkleRecover {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        let mut current = self.element.clone();
        for (dir, sibling) in self.path.iter().zip(&self.proof) {
            let left = api::call(api, &Hash { in_1: current.clone(), in_2: sibling.clone() })?;
            let right = api::call(api, &Hash { in_1: sibling.clone(), in_2: current.clone() })?;
            current = api.select(dir.clone(), right, left)?;
        }
        api.assert_is_equal(current, self.root.clone())
    }
}


#[derive(Default, Record)]
pub struct BitsRoundTrip {
    pub x: Variable,
}

impl Circuit for BitsRoundTrip {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        let bits = api.to_binary(self.x.clone(), Some(3))?;
        let y = api.from_binary(bits)?;
        api.assert_is_equal(y, self.x.clone())
    }
}


/// Sum of all elements.  The vector length is part of the gadget's name.
#[derive(Clone, Default, Record)]
pub struct Sum {
    pub xs: Vec<Variable>,
}

impl GadgetDefinition for Sum {
    fn define_gadget(&self, api: &mut dyn Api) -> ApiResult {
        api.add(self.xs[0].clone(), self.xs[1].clone(), &self.xs[2 ..])
    }
}

#[derive(Default, Record)]
pub struct TwoSums {
    pub a: [Variable; 3],
    pub b: [Variable; 2],
    pub c: Variable,
}

impl Circuit for TwoSums {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        let sa = api::call(api, &Sum { xs: self.a.to_vec() })?;
        let sb = api::call(api, &Sum { xs: self.b.to_vec() })?;
        let sa2 = api::call(api, &Sum { xs: self.a.to_vec() })?;
        let total = api.add(sa, sb, &[sa2])?;
        api.assert_is_equal(total, self.c.clone())
    }
}


/// Little-endian bits of `x`.
#[derive(Clone, Default, Record)]
pub struct ToBits {
    pub x: Variable,
    pub width: u32,
}

impl GadgetDefinition for ToBits {
    fn define_gadget(&self, api: &mut dyn Api) -> ApiResult {
        Ok(api.to_binary(self.x.clone(), Some(self.width as i64))?.into())
    }
}

/// Swap the two halves of a 2x2 matrix and return it.
#[derive(Clone, Default, Record)]
pub struct SwapRows {
    pub m: [[Variable; 2]; 2],
}

impl GadgetDefinition for SwapRows {
    fn define_gadget(&self, _api: &mut dyn Api) -> ApiResult {
        Ok(Variable::List(vec![
            Variable::from(&self.m[1][..]),
            Variable::from(&self.m[0][..]),
        ]))
    }
}

#[derive(Default, Record)]
pub struct Vectors {
    pub x: Variable,
    pub m: [[Variable; 2]; 2],
}

impl Circuit for Vectors {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        let bits: Vec<Variable> = api::call_as(api, &ToBits { x: self.x.clone(), width: 3 })?;
        api.assert_is_boolean(bits[2].clone())?;
        let swapped: Vec<Vec<Variable>> = api::call_as(api, &SwapRows { m: self.m.clone() })?;
        let again: Vec<Vec<Variable>> = api::call_as(api, &SwapRows {
            m: [
                [swapped[0][0].clone(), swapped[0][1].clone()],
                [swapped[1][0].clone(), swapped[1][1].clone()],
            ],
        })?;
        api.assert_is_equal(again[1][0].clone(), self.m[1][0].clone())
    }
}


#[derive(Clone, Default, Record)]
pub struct AssertBool {
    pub a: Variable,
}

impl GadgetDefinition for AssertBool {
    fn define_gadget(&self, api: &mut dyn Api) -> ApiResult {
        api.assert_is_boolean(self.a.clone())?;
        Ok(Variable::Nil)
    }
}

#[derive(Default, Record)]
pub struct BoolPair {
    pub a: Variable,
    pub b: Variable,
}

impl Circuit for BoolPair {
    fn define(&self, api: &mut dyn Api) -> ApiResult<()> {
        api::call_void(api, &AssertBool { a: self.a.clone() })?;
        api::call_void(api, &AssertBool { a: self.b.clone() })?;
        Ok(())
    }
}
