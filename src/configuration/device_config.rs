use crate::configuration::ConfigurationError;

use serde::Deserialize;

use std::convert::TryFrom;
use std::time::Duration;

use tokio_serial::DataBits;
use tokio_serial::FlowControl;
use tokio_serial::Parity;
use tokio_serial::SerialPortBuilder;
use tokio_serial::StopBits;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct DeviceConfig {
    pub name: String,
    pub device: String,
    pub baud_rate: Option<u32>,
    pub framing: Option<String>,
    pub flow_control: Option<String>,
    pub timeout: Option<u32>,
}

impl TryFrom<DeviceConfig> for SerialPortBuilder {
    type Error = ConfigurationError;

    fn try_from(config: DeviceConfig) -> Result<SerialPortBuilder, ConfigurationError> {
        let mut data_bits = DataBits::Eight;
        let mut flow_control = FlowControl::None;
        let mut parity = Parity::None;
        let mut stop_bits = StopBits::One;
        let mut timeout = Duration::from_millis(1);

        let baud_rate = config.baud_rate.unwrap_or(38400);

        if let Some(f) = config.framing {
            if f.len() != 3 {
                return Err(ConfigurationError::InvalidFraming(f));
            }

            let framing_data_bits = f.chars().next().unwrap_or_default();

            data_bits = match framing_data_bits {
                '8' => DataBits::Eight,
                '7' => DataBits::Seven,
                '6' => DataBits::Six,
                '5' => DataBits::Five,
                _ => return Err(ConfigurationError::InvalidDataBits(framing_data_bits)),
            };

            let framing_parity = f.chars().nth(1).unwrap_or_default();

            parity = match framing_parity {
                'N' => Parity::None,
                'O' => Parity::Odd,
                'E' => Parity::Even,
                _ => return Err(ConfigurationError::InvalidParity(framing_parity)),
            };

            let framing_stop_bits = f.chars().nth(2).unwrap_or_default();

            stop_bits = match framing_stop_bits {
                '1' => StopBits::One,
                '2' => StopBits::Two,
                _ => return Err(ConfigurationError::InvalidStopBits(framing_stop_bits)),
            };
        };

        if let Some(f) = config.flow_control {
            if f.len() != 1 {
                return Err(ConfigurationError::InvalidFlowControl(f));
            }

            flow_control = match f.chars().next().unwrap_or_default() {
                'H' => FlowControl::Hardware,
                'S' => FlowControl::Software,
                'N' => FlowControl::None,
                _ => return Err(ConfigurationError::InvalidFlowControl(f)),
            };
        }

        if let Some(t) = config.timeout {
            timeout = Duration::from_millis(t.into());
        }

        Ok(tokio_serial::new(config.device, baud_rate)
            .data_bits(data_bits)
            .flow_control(flow_control)
            .parity(parity)
            .stop_bits(stop_bits)
            .timeout(timeout))
    }
}
