/// A run of bits inside a packed `u32` word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitField {
    offset: u32,
    width: u32,
}

impl BitField {
    pub const fn new(offset: u32, width: u32) -> Self {
        assert!(width > 0 && width < 32);
        assert!(offset + width <= 32);

        Self { offset, width }
    }

    pub const fn offset(self) -> u32 {
        self.offset
    }

    pub const fn width(self) -> u32 {
        self.width
    }

    /// Returns the largest value this field can hold.
    pub const fn max_value(self) -> u32 {
        (1 << self.width) - 1
    }

    /// Returns bits occupied by this field within the word.
    pub const fn mask(self) -> u32 {
        self.max_value() << self.offset
    }

    pub const fn overlaps(self, other: Self) -> bool {
        self.mask() & other.mask() != 0
    }

    pub fn get(self, word: u32) -> u32 {
        (word >> self.offset) & self.max_value()
    }

    pub fn get_bool(self, word: u32) -> bool {
        self.get(word) != 0
    }

    /// Stores `value` into `word`, replacing whatever this field held.
    ///
    /// Bits of `value` that don't fit into the field are dropped - callers
    /// are expected to validate (or saturate) beforehand.
    pub fn set(self, word: &mut u32, value: u32) {
        *word = (*word & !self.mask())
            | ((value & self.max_value()) << self.offset);
    }

    pub fn set_bool(self, word: &mut u32, value: bool) {
        self.set(word, value as u32);
    }
}
