//! Per-shift progress vector

/// Progress of one activity, one value per calendar slot
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressVector {
    values: Vec<f64>,
}

impl ProgressVector {
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Replace every slot, e.g. with the prior-day figures
    pub fn overwrite(&mut self, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.values.len());
        self.values = values;
    }

    /// Keep the larger of the current value and `value`
    pub fn raise(&mut self, slot: usize, value: f64) {
        if let Some(current) = self.values.get_mut(slot) {
            *current = current.max(value);
        }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_never_lowers() {
        let mut v = ProgressVector::zeros(2);
        v.overwrite(vec![0.5, 0.25]);
        v.raise(0, 0.25);
        v.raise(1, 0.75);
        assert_eq!(v.into_values(), vec![0.5, 0.75]);
    }

    #[test]
    fn raise_out_of_range_is_ignored() {
        let mut v = ProgressVector::zeros(1);
        v.raise(3, 1.0);
        assert_eq!(v.total(), 0.0);
    }
}
