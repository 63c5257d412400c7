//! Double-buffered field storage.
//!
//! [`PingPong`] keeps two equal-length buffers that alternate between
//! "published" (readable) and "staging" (writable) roles. A step:
//! 1. `stage()` borrows the published buffer read-only and the staging
//!    buffer mutably
//! 2. the stencil writes every staging cell from published values
//! 3. `publish()` swaps the roles and bumps the generation
//!
//! The published buffer is never written during a pass.

/// Two owned `f64` buffers swapped by flag after every pass.
///
/// # Examples
///
/// ```
/// use calor_grid::PingPong;
///
/// let mut buf = PingPong::new(vec![1.0, 2.0, 3.0]);
/// {
///     let (prev, next) = buf.stage();
///     for (n, p) in next.iter_mut().zip(prev) {
///         *n = p * 2.0;
///     }
/// }
/// buf.publish();
/// assert_eq!(buf.front(), &[2.0, 4.0, 6.0]);
/// assert_eq!(buf.generation(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PingPong {
    buffer_a: Vec<f64>,
    buffer_b: Vec<f64>,
    /// `true` when buffer A is the published one.
    a_published: bool,
    generation: u64,
}

impl PingPong {
    /// Wrap an initial field. The staging buffer starts as a copy.
    pub fn new(initial: Vec<f64>) -> Self {
        let buffer_b = initial.clone();
        Self {
            buffer_a: initial,
            buffer_b,
            a_published: true,
            generation: 0,
        }
    }

    /// Number of cells in each buffer.
    pub fn len(&self) -> usize {
        self.buffer_a.len()
    }

    /// Whether the buffers hold no cells.
    pub fn is_empty(&self) -> bool {
        self.buffer_a.is_empty()
    }

    /// Number of completed `publish()` calls.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The published buffer.
    pub fn front(&self) -> &[f64] {
        if self.a_published {
            &self.buffer_a
        } else {
            &self.buffer_b
        }
    }

    /// Mutable access to the published buffer, for direct cell writes
    /// between passes.
    pub fn front_mut(&mut self) -> &mut [f64] {
        if self.a_published {
            &mut self.buffer_a
        } else {
            &mut self.buffer_b
        }
    }

    /// Borrow `(published, staging)` for one pass.
    pub fn stage(&mut self) -> (&[f64], &mut [f64]) {
        if self.a_published {
            (&self.buffer_a, &mut self.buffer_b)
        } else {
            (&self.buffer_b, &mut self.buffer_a)
        }
    }

    /// Make the staging buffer the published one.
    pub fn publish(&mut self) {
        self.a_published = !self.a_published;
        self.generation += 1;
    }
}
