//! Scoped transform state

use crate::foundation::math::Mat4;

/// Stack of object-to-world transform frames
///
/// The stack is never empty: a guard frame remains at the bottom and an
/// unmatched pop is a warned no-op. `set`/`concat` only ever touch the top
/// frame, so a popped scope restores the parent's frame untouched.
#[derive(Debug, Clone)]
pub struct TransformStack {
    frames: Vec<Mat4>,
}

impl TransformStack {
    /// Create a stack holding an identity guard frame
    pub fn new() -> Self {
        Self {
            frames: vec![Mat4::identity()],
        }
    }

    /// Create a stack whose guard frame is `frame`
    ///
    /// Used when a child session inherits its parent's current frame.
    pub fn with_frame(frame: Mat4) -> Self {
        Self { frames: vec![frame] }
    }

    /// Open a scope by duplicating the top frame
    pub fn push(&mut self) {
        let top = self.current();
        self.frames.push(top);
    }

    /// Close a scope
    ///
    /// Popping the guard frame is a begin/end mismatch: warn and leave the
    /// stack unchanged.
    pub fn pop(&mut self) {
        if self.frames.len() <= 1 {
            log::warn!("transform_end() without matching transform_begin()");
            return;
        }
        self.frames.pop();
    }

    /// Replace the top frame
    pub fn set(&mut self, m: Mat4) {
        *self.frames.last_mut().expect("stack is never empty") = m;
    }

    /// Concatenate onto the top frame: `new = m * existing`
    pub fn concat(&mut self, m: Mat4) {
        let top = self.frames.last_mut().expect("stack is never empty");
        *top = m * *top;
    }

    /// The current (top) frame, by value
    pub fn current(&self) -> Mat4 {
        *self.frames.last().expect("stack is never empty")
    }

    /// Number of frames on the stack, guard included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Look up a named coordinate system
    ///
    /// Unsupported; warns and returns identity.
    pub fn get_named(&self, name: &str) -> Mat4 {
        log::warn!("named coordinate system \"{name}\" not supported; returning identity");
        Mat4::identity()
    }

    /// Forcibly unwind to the guard frame and reset it to identity
    ///
    /// Recovery path for scopes still open at world-begin.
    pub fn unwind(&mut self) {
        self.frames.truncate(1);
        self.frames[0] = Mat4::identity();
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_stack_never_empties() {
        let mut stack = TransformStack::new();
        stack.pop();
        stack.pop();

        assert_eq!(stack.depth(), 1);
        assert_relative_eq!(stack.current(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_unmatched_pop_leaves_top_unchanged() {
        let mut stack = TransformStack::new();
        let m = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        stack.set(m);
        stack.pop();

        assert_relative_eq!(stack.current(), m, epsilon = EPSILON);
    }

    #[test]
    fn test_push_duplicates_and_pop_restores() {
        let mut stack = TransformStack::new();
        let parent = Mat4::new_translation(&Vec3::new(5.0, 0.0, 0.0));
        stack.set(parent);

        stack.push();
        assert_relative_eq!(stack.current(), parent, epsilon = EPSILON);

        stack.concat(Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0)));
        stack.pop();
        assert_relative_eq!(stack.current(), parent, epsilon = EPSILON);
    }

    #[test]
    fn test_concat_composes_left_to_right() {
        // concat(A) then concat(B) must equal a single concat(B * A)
        let a = Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0));
        let b = Mat4::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);

        let mut sequential = TransformStack::new();
        sequential.concat(a);
        sequential.concat(b);

        let mut combined = TransformStack::new();
        combined.concat(b * a);

        assert_relative_eq!(sequential.current(), combined.current(), epsilon = EPSILON);
    }

    #[test]
    fn test_named_lookup_returns_identity() {
        let stack = TransformStack::new();
        assert_relative_eq!(stack.get_named("world"), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_unwind_resets_guard() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.push();
        stack.set(Mat4::new_translation(&Vec3::new(9.0, 9.0, 9.0)));

        stack.unwind();
        assert_eq!(stack.depth(), 1);
        assert_relative_eq!(stack.current(), Mat4::identity(), epsilon = EPSILON);
    }
}
