use rand::{seq::SliceRandom, Rng};

/// Uniformly permute a copy of `options`; the input slice is left untouched
pub fn shuffle<R: Rng + ?Sized>(options: &[String], rng: &mut R) -> Vec<String> {
    let mut shuffled = options.to_vec();
    // Fisher-Yates
    shuffled.shuffle(rng);
    shuffled
}

/// Shuffled options for one question index, held until the index changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionOrder {
    index: usize,
    options: Vec<String>,
}

impl OptionOrder {
    pub fn new<R: Rng + ?Sized>(index: usize, options: &[String], rng: &mut R) -> Self {
        Self {
            index,
            options: shuffle(options, rng),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_for(&self, index: usize) -> bool {
        self.index == index
    }
}
