//! Published print queues. Read-only.

use crate::client::Directory;
use crate::entry::{DirectoryObject, EntityClass};
use crate::error::DirectoryResult;

use super::DirectoryView;

/// A print queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Printer(DirectoryObject);

impl Printer {
    /// Attributes loaded when binding a printer.
    pub const ATTRIBUTES: &'static [&'static str] = &[
        "cn",
        "objectGUID",
        "distinguishedName",
        "objectClass",
        "whenCreated",
        "whenChanged",
        "description",
        "location",
        "driverName",
        "driverVersion",
        "portName",
        "printerName",
        "printLanguage",
        "printKeepPrintedJobs",
        "printShareName",
        "serverName",
        "shortServerName",
        "uNCName",
        "url",
        "printBinNames",
        "printCollate",
        "printColor",
        "printDuplexSupported",
        "printMaxResolutionSupported",
        "printMediaReady",
        "printMediaSupported",
        "printMemory",
        "printOrientationsSupported",
        "printPagesPerMinute",
        "printRate",
        "printRateUnit",
        "printStaplingSupported",
        "printSpooling",
        "priority",
    ];

    /// Wraps an object, checking its class.
    ///
    /// ## Errors
    ///
    /// `WrongEntityClass` if the object is not a print queue.
    pub fn try_from_object(object: DirectoryObject) -> DirectoryResult<Self> {
        object.require_class(EntityClass::Printer)?;
        Ok(Self(object))
    }

    /// Binds to the print queue at `dn`.
    ///
    /// ## Errors
    ///
    /// `NotFound` or `WrongEntityClass`.
    pub async fn bind<D: Directory>(directory: &D, dn: &str) -> DirectoryResult<Self> {
        Self::try_from_object(directory.read_by_dn(dn, Self::ATTRIBUTES).await?)
    }

    text_getters! {
        /// Description.
        description => "description";
        /// Physical location.
        location => "location";
        /// Driver name.
        driver_name => "driverName";
        /// Port the queue prints to.
        port_name => "portName";
        /// Printer name.
        printer_name => "printerName";
        /// Share name.
        share_name => "printShareName";
        /// Hosting print server.
        server_name => "serverName";
        /// Hosting print server, short form.
        short_server_name => "shortServerName";
        /// UNC path of the share.
        unc_name => "uNCName";
        /// Web address.
        url => "url";
        /// Unit of [`rate`](Self::rate).
        rate_unit => "printRateUnit";
        /// Spooling mode.
        spooling => "printSpooling";
    }

    /// Driver version.
    #[must_use]
    pub fn driver_version(&self) -> Option<i64> {
        self.0.get_optional_int("driverVersion")
    }

    /// Paper trays.
    #[must_use]
    pub fn bin_names(&self) -> Vec<String> {
        self.0.get_list("printBinNames")
    }

    /// Media currently loaded.
    #[must_use]
    pub fn media_ready(&self) -> Vec<String> {
        self.0.get_list("printMediaReady")
    }

    /// Media the device accepts.
    #[must_use]
    pub fn media_supported(&self) -> Vec<String> {
        self.0.get_list("printMediaSupported")
    }

    /// Supported orientations.
    #[must_use]
    pub fn orientations_supported(&self) -> Vec<String> {
        self.0.get_list("printOrientationsSupported")
    }

    /// Whether the device collates.
    #[must_use]
    pub fn collate(&self) -> Option<bool> {
        self.0.get_optional_bool("printCollate")
    }

    /// Whether the device prints in color.
    #[must_use]
    pub fn color(&self) -> Option<bool> {
        self.0.get_optional_bool("printColor")
    }

    /// Whether duplex printing is supported.
    #[must_use]
    pub fn duplex_supported(&self) -> Option<bool> {
        self.0.get_optional_bool("printDuplexSupported")
    }

    /// Page description languages.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.0.get_list("printLanguage")
    }

    /// Whether completed jobs stay in the queue.
    #[must_use]
    pub fn keep_printed_jobs(&self) -> Option<bool> {
        self.0.get_optional_bool("printKeepPrintedJobs")
    }

    /// Whether stapling is supported.
    #[must_use]
    pub fn stapling_supported(&self) -> Option<bool> {
        self.0.get_optional_bool("printStaplingSupported")
    }

    /// Maximum resolution in dpi.
    #[must_use]
    pub fn max_resolution(&self) -> Option<i64> {
        self.0.get_optional_int("printMaxResolutionSupported")
    }

    /// Installed memory in kilobytes.
    #[must_use]
    pub fn memory(&self) -> Option<i64> {
        self.0.get_optional_int("printMemory")
    }

    /// Pages per minute.
    #[must_use]
    pub fn pages_per_minute(&self) -> Option<i64> {
        self.0.get_optional_int("printPagesPerMinute")
    }

    /// Print rate in [`rate_unit`](Self::rate_unit).
    #[must_use]
    pub fn rate(&self) -> Option<i64> {
        self.0.get_optional_int("printRate")
    }

    /// Queue priority.
    #[must_use]
    pub fn priority(&self) -> Option<i64> {
        self.0.get_optional_int("priority")
    }
}

impl DirectoryView for Printer {
    fn object(&self) -> &DirectoryObject {
        &self.0
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printer_attributes() {
        let object = DirectoryObject::builder("CN=PRN-2F,CN=PS01,OU=Servers,DC=example,DC=com")
            .attrs("objectClass", ["top", "leaf", "connectionPoint", "printQueue"])
            .attr("printerName", "Second Floor")
            .attr("printColor", "TRUE")
            .attr("printDuplexSupported", "FALSE")
            .attr("printPagesPerMinute", "40")
            .attrs("printMediaSupported", ["A4", "Letter"])
            .build();
        let printer = Printer::try_from_object(object).unwrap();

        assert_eq!(printer.printer_name().as_deref(), Some("Second Floor"));
        assert_eq!(printer.color(), Some(true));
        assert_eq!(printer.duplex_supported(), Some(false));
        assert_eq!(printer.collate(), None);
        assert_eq!(printer.pages_per_minute(), Some(40));
        assert_eq!(printer.media_supported(), vec!["A4", "Letter"]);
        assert!(printer.bin_names().is_empty());
    }
}
