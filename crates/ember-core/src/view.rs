//! Passive mirror of a heater on the observing side.
//!
//! A [`HeaterView`] never ticks. It only holds what the last
//! [`SyncPayload`] said, so displays can show tank levels and progress.

use crate::config::HeaterConfig;
use crate::persist::{DeserializeError, SyncPayload, check_fits};
use crate::tank::{FluidTank, TankInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaterView {
    input: FluidTank,
    output: FluidTank,
    settle: u32,
}

impl HeaterView {
    /// An empty view sized like a heater built from `config`.
    pub fn new(config: &HeaterConfig) -> Self {
        Self {
            input: FluidTank::new(config.input_capacity),
            output: FluidTank::new(config.output_capacity),
            settle: 0,
        }
    }

    /// Replace the mirrored state. A payload that does not fit the view's
    /// tanks is rejected and the view is left as it was.
    pub fn apply(&mut self, payload: &SyncPayload) -> Result<(), DeserializeError> {
        check_fits("input", payload.input, &self.input)?;
        check_fits("output", payload.output, &self.output)?;
        self.input.set_contents(payload.input);
        self.output.set_contents(payload.output);
        self.settle = payload.sleep;
        Ok(())
    }

    pub fn apply_bytes(&mut self, data: &[u8]) -> Result<(), DeserializeError> {
        let payload = SyncPayload::decode(data)?;
        self.apply(&payload)
    }

    pub fn input(&self) -> TankInfo {
        self.input.info()
    }

    pub fn output(&self) -> TankInfo {
        self.output.info()
    }

    pub fn settle(&self) -> u32 {
        self.settle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Direction;
    use crate::tank::FluidStack;
    use crate::test_utils::*;

    #[test]
    fn view_mirrors_heater_after_sync() {
        let mut heater = make_heater(vec![oil_recipe()]);
        let _ = pour(&mut heater, FluidStack::new(oil(), 25));
        charge(&mut heater, 100);
        run(&mut heater, &mut TestSite::empty(Direction::North), 0, 3);

        let mut view = HeaterView::new(heater.config());
        let bytes = heater.sync_payload().encode().unwrap();
        view.apply_bytes(&bytes).unwrap();

        assert_eq!(view.input(), heater.input_tank().info());
        assert_eq!(view.output(), heater.output_tank().info());
        assert_eq!(view.settle(), heater.settle());
    }

    #[test]
    fn empty_payload_clears_view() {
        let mut view = HeaterView::new(&HeaterConfig::default());
        view.apply(&SyncPayload {
            input: Some(FluidStack::new(oil(), 5)),
            output: Some(FluidStack::new(hot_oil(), 5)),
            sleep: 3,
        })
        .unwrap();

        view.apply(&SyncPayload {
            input: None,
            output: None,
            sleep: 0,
        })
        .unwrap();

        assert!(view.input().contents.is_none());
        assert!(view.output().contents.is_none());
        assert_eq!(view.settle(), 0);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let mut view = HeaterView::new(&HeaterConfig::default());
        let before = view.clone();
        let result = view.apply(&SyncPayload {
            input: None,
            output: Some(FluidStack::new(hot_oil(), 4000)),
            sleep: 1,
        });
        assert!(matches!(
            result,
            Err(DeserializeError::Overfull { tank: "output", .. })
        ));
        assert_eq!(view, before);
    }
}
