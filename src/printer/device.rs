//! High-level printer operations.
//!
//! One method per catalog entry. Replies come back as raw bytes; their
//! format differs between firmware revisions and is left to the caller.

use log::info;

use super::session::Session;
use crate::error::Result;
use crate::protocol::{Request, commands};
use crate::transport::Connector;

impl<C: Connector> Session<C> {
    fn request(&mut self, request: Request) -> Result<Vec<u8>> {
        Ok(self.dispatch(&request)?.unwrap_or_default())
    }

    /// SET_PAPER_TYPE (0x2D).
    pub fn set_paper_type(&mut self, paper_type: u8) -> Result<Vec<u8>> {
        info!("SET_PAPER_TYPE {}", paper_type);
        self.request(commands::set_paper_type(paper_type))
    }

    /// SET_POWER_DOWN_TIME (0x1F) - idle time before auto power-off.
    pub fn set_power_off_time(&mut self, time: u16) -> Result<Vec<u8>> {
        info!("SET_POWER_DOWN_TIME {}", time);
        self.request(commands::set_power_off_time(time))
    }

    /// SET_HEAT_DENSITY (0x1A).
    pub fn set_heat_density(&mut self, density: u8) -> Result<Vec<u8>> {
        info!("SET_HEAT_DENSITY {}", density);
        self.request(commands::set_heat_density(density))
    }

    /// PRINT_DATA (0x00) - send a bitstream without waiting for a reply.
    ///
    /// Follow it with [`Session::feed_line`] to learn when the printer has
    /// taken the data.
    pub fn print_data(&mut self, bitstream: Vec<u8>) -> Result<()> {
        info!("PRINT_DATA {} bytes", bitstream.len());
        self.dispatch(&commands::print_data(bitstream))?;
        Ok(())
    }

    /// PRINT_TEST_PAGE (0x21).
    pub fn print_test_page(&mut self) -> Result<Vec<u8>> {
        info!("PRINT_TEST_PAGE");
        self.request(commands::print_test_page())
    }

    /// FEED_LINE (0x1B).
    pub fn feed_line(&mut self, lines: u16) -> Result<Vec<u8>> {
        info!("FEED_LINE {}", lines);
        self.request(commands::feed_line(lines))
    }

    /// FEED_TO_HEAD_LINE (0x22).
    pub fn feed_to_head_line(&mut self, lines: u16) -> Result<Vec<u8>> {
        info!("FEED_TO_HEAD_LINE {}", lines);
        self.request(commands::feed_to_head_line(lines))
    }

    /// GET_BAT_STATUS (0x11).
    pub fn query_battery_status(&mut self) -> Result<Vec<u8>> {
        self.request(commands::query_battery_status())
    }

    /// GET_HEAT_DENSITY (0x1D).
    pub fn query_heat_density(&mut self) -> Result<Vec<u8>> {
        self.request(commands::query_heat_density())
    }

    /// GET_POWER_DOWN_TIME (0x20).
    pub fn query_power_off_time(&mut self) -> Result<Vec<u8>> {
        self.request(commands::query_power_off_time())
    }

    /// GET_SN (0x0B).
    pub fn query_serial_number(&mut self) -> Result<Vec<u8>> {
        self.request(commands::query_serial_number())
    }

    /// GET_HW_INFO (0x26).
    pub fn query_hardware_info(&mut self) -> Result<Vec<u8>> {
        self.request(commands::query_hardware_info())
    }
}
