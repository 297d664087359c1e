//! Temperature sensor converter (ESP-IDF ADC oneshot).
//!
//! One ADC1 channel, 12-bit, 12 dB attenuation.  Implements
//! [`AnalogPort`] by returning the raw count; scaling to degrees is the
//! controller's business.

use esp_idf_sys::*;
use log::info;

use crate::app::ports::AnalogPort;
use crate::error::{HalError, Result};

/// ADC1 oneshot unit bound to a single channel.
pub struct OneshotAdc {
    handle: adc_oneshot_unit_handle_t,
    channel: adc_channel_t,
}

impl OneshotAdc {
    pub fn new(channel: adc_channel_t) -> Result<Self> {
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        // SAFETY: `handle` is written once here and owned by the returned value.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
        if ret != ESP_OK as i32 {
            log::error!("adc: unit init failed (rc={})", ret);
            return Err(HalError::Adc);
        }

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: handle is the live unit created above.
        let ret = unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            log::error!("adc: channel {} config failed (rc={})", channel, ret);
            // SAFETY: unit was created above and is not shared.
            unsafe { adc_oneshot_del_unit(handle) };
            return Err(HalError::Adc);
        }

        info!("adc: ADC1 channel {} configured", channel);
        Ok(Self { handle, channel })
    }
}

impl AnalogPort for OneshotAdc {
    fn read_sample(&mut self) -> Result<u16> {
        let mut raw: i32 = 0;
        // SAFETY: handle stays valid for the lifetime of self; only the
        // scheduler loop calls this.
        let ret = unsafe { adc_oneshot_read(self.handle, self.channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(HalError::Adc);
        }
        Ok(raw.max(0) as u16)
    }
}

impl Drop for OneshotAdc {
    fn drop(&mut self) {
        // SAFETY: handle came from adc_oneshot_new_unit.
        unsafe { adc_oneshot_del_unit(self.handle) };
    }
}
