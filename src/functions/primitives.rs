use crate::functions::traits::Primitive;

// --- Binary arithmetic ---
pub struct Add;
impl Primitive for Add {
    fn name(&self) -> &'static str { "Add" }
    fn arity(&self) -> usize { 2 }
    fn eval(&self, args: &[f64]) -> f64 {
        args[0] + args[1]
    }
}

pub struct Minus;
impl Primitive for Minus {
    fn name(&self) -> &'static str { "Minus" }
    fn arity(&self) -> usize { 2 }
    fn eval(&self, args: &[f64]) -> f64 {
        args[0] - args[1]
    }
}

pub struct Mul;
impl Primitive for Mul {
    fn name(&self) -> &'static str { "Mul" }
    fn arity(&self) -> usize { 2 }
    fn eval(&self, args: &[f64]) -> f64 {
        args[0] * args[1]
    }
}

pub struct Div;
impl Primitive for Div {
    fn name(&self) -> &'static str { "Div" }
    fn arity(&self) -> usize { 2 }
    fn eval(&self, args: &[f64]) -> f64 {
        if args[1] == 0.0 {
            f64::NAN
        } else {
            args[0] / args[1]
        }
    }
}

// --- Unary arithmetic ---
pub struct Negate;
impl Primitive for Negate {
    fn name(&self) -> &'static str { "Negate" }
    fn arity(&self) -> usize { 1 }
    fn eval(&self, args: &[f64]) -> f64 {
        -args[0]
    }
}

pub struct Invert;
impl Primitive for Invert {
    fn name(&self) -> &'static str { "Invert" }
    fn arity(&self) -> usize { 1 }
    fn eval(&self, args: &[f64]) -> f64 {
        if args[0] == 0.0 {
            f64::NAN
        } else {
            1.0 / args[0]
        }
    }
}

pub struct Sqrt;
impl Primitive for Sqrt {
    fn name(&self) -> &'static str { "Sqrt" }
    fn arity(&self) -> usize { 1 }
    fn eval(&self, args: &[f64]) -> f64 {
        if args[0] <= 0.0 {
            f64::NAN
        } else {
            args[0].sqrt()
        }
    }
}
