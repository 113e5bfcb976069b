//! Serial port adapter using the `serialport` crate
//!
//! Implements `SerialFactory` and `SerialConnection`. The radio side of the
//! link is fixed at 8 data bits / no parity / 2 stop bits with a short read
//! timeout, so reads return quickly and the UI stays fresh.

use std::time::Duration;

use serialport::{ClearBuffer, DataBits, Parity, StopBits};

use crate::domain::{CatError, CatResult, SerialPortInfo};
use crate::ports::{SerialConnection, SerialFactory};

/// Read timeout for a single serial read call
const READ_TIMEOUT_MS: u64 = 200;

/// Zero-sized factory for creating serial port connections.
pub struct SerialPortFactory;

impl SerialFactory for SerialPortFactory {
    fn list_ports() -> CatResult<Vec<SerialPortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| CatError::Serial(format!("Failed to list ports: {e}")))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let port_type = match &p.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        format!("USB ({:04X}:{:04X})", info.vid, info.pid)
                    }
                    serialport::SerialPortType::PciPort => "PCI".to_string(),
                    serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                    serialport::SerialPortType::Unknown => "Native".to_string(),
                };
                SerialPortInfo {
                    name: p.port_name,
                    port_type,
                }
            })
            .collect())
    }

    fn open(port: &str, baud_rate: u32) -> CatResult<Box<dyn SerialConnection>> {
        let serial = serialport::new(port, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::Two)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()
            .map_err(|e| CatError::Serial(format!("Failed to open {port}: {e}")))?;

        Ok(Box::new(SerialPortConnection {
            port: serial,
            connected: true,
        }))
    }
}

/// An open serial port connection wrapping the `serialport` crate.
pub struct SerialPortConnection {
    port: Box<dyn serialport::SerialPort>,
    connected: bool,
}

impl SerialConnection for SerialPortConnection {
    fn write(&mut self, data: &[u8]) -> CatResult<usize> {
        use std::io::Write;
        self.port
            .write(data)
            .map_err(|e| CatError::Serial(format!("Write failed: {e}")))
    }

    fn read(&mut self, buffer: &mut [u8]) -> CatResult<usize> {
        use std::io::Read;
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            // A timeout is the normal "nothing arrived yet" case, not a
            // broken link
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(CatError::Serial(format!("Read failed: {e}"))),
        }
    }

    fn flush_input(&mut self) -> CatResult<()> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| CatError::Serial(format!("Input flush failed: {e}")))
    }

    fn close(&mut self) -> CatResult<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
