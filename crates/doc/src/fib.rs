//! The File Information Block at the start of the `WordDocument` stream.

use oletext_cfb::SectorReader;
use oletext_core::Result;

/// FIB flag selecting `1Table` over `0Table` (fWhichTblStm).
const FLAG_WHICH_TABLE_STREAM: u16 = 0x0200;

/// The FIB fields text extraction needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fib {
    pub flags: u16,
    /// Main document characters.
    pub ccp_text: u32,
    /// Footnote characters.
    pub ccp_ftn: u32,
    /// Header/footer characters.
    pub ccp_hdd: u32,
    /// Macro characters.
    pub ccp_mcr: u32,
    /// Annotation characters.
    pub ccp_atn: u32,
    /// Endnote characters.
    pub ccp_edn: u32,
    /// Textbox characters.
    pub ccp_txbx: u32,
    /// Header textbox characters.
    pub ccp_hdr_txbx: u32,
    /// Offset of the CLX inside the table stream.
    pub fc_clx: u32,
    /// Size of the CLX.
    pub lcb_clx: u32,
}

impl Fib {
    pub fn parse(word_document: &[u8]) -> Result<Self> {
        let reader = SectorReader::le(word_document);
        Ok(Self {
            flags: reader.u16(0x000A)?,
            ccp_text: reader.u32(0x004C)?,
            ccp_ftn: reader.u32(0x0050)?,
            ccp_hdd: reader.u32(0x0054)?,
            ccp_mcr: reader.u32(0x0058)?,
            ccp_atn: reader.u32(0x005C)?,
            ccp_edn: reader.u32(0x0060)?,
            ccp_txbx: reader.u32(0x0064)?,
            ccp_hdr_txbx: reader.u32(0x0068)?,
            fc_clx: reader.u32(0x01A2)?,
            lcb_clx: reader.u32(0x01A6)?,
        })
    }

    /// Name of the companion table stream.
    pub fn table_stream_name(&self) -> &'static str {
        if self.flags & FLAG_WHICH_TABLE_STREAM != 0 {
            "1Table"
        } else {
            "0Table"
        }
    }

    /// The character position that closes the piece table.
    ///
    /// All stories share one CP space. When any story besides the main text
    /// is present, one extra CP terminates the final story.
    pub fn last_cp(&self) -> u32 {
        let others = [
            self.ccp_ftn,
            self.ccp_hdd,
            self.ccp_mcr,
            self.ccp_atn,
            self.ccp_edn,
            self.ccp_txbx,
            self.ccp_hdr_txbx,
        ]
        .iter()
        .fold(0u32, |acc, &n| acc.wrapping_add(n));

        let boundary = u32::from(others != 0);
        others.wrapping_add(boundary).wrapping_add(self.ccp_text)
    }
}
