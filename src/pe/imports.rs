//! Import directory parsing and import hashing.

use crate::pe::sections::SectionTable;
use crate::pe::types::*;
use crate::pe::utils::{read_cstring, ReadExt};

/// Ceiling on total imported symbols walked; malformed tables can loop.
const MAX_IMPORTS: usize = 4096;

/// One imported symbol: by name or by ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedSymbol {
    Name(String),
    Ordinal(u16),
}

/// One imported module with its functions in file order.
#[derive(Debug, Clone)]
pub struct ImportedModule {
    pub name: String,
    pub symbols: Vec<ImportedSymbol>,
}

/// Walk the import directory table in file order.
pub fn parse_imports(
    data: &[u8],
    sections: &SectionTable,
    import_dir: &DataDirectory,
    is_64bit: bool,
) -> Result<Vec<ImportedModule>> {
    let mut modules = Vec::new();
    if import_dir.virtual_address == 0 || import_dir.size == 0 {
        return Ok(modules);
    }

    let mut offset = sections
        .rva_to_offset(import_dir.virtual_address)
        .ok_or(PeError::InvalidRva {
            rva: import_dir.virtual_address,
        })?;

    let mut total = 0usize;
    loop {
        if offset + 20 > data.len() {
            break;
        }
        // All-zero descriptor terminates the table
        if data[offset..offset + 20].iter().all(|&b| b == 0) {
            break;
        }

        let original_first_thunk = data
            .read_u32_le_at(offset)
            .ok_or(PeError::InvalidOffset { offset })?;
        let name_rva = data
            .read_u32_le_at(offset + 12)
            .ok_or(PeError::InvalidOffset { offset: offset + 12 })?;
        let first_thunk = data
            .read_u32_le_at(offset + 16)
            .ok_or(PeError::InvalidOffset { offset: offset + 16 })?;

        if name_rva == 0 {
            offset += 20;
            continue;
        }

        let name_offset = sections
            .rva_to_offset(name_rva)
            .ok_or(PeError::InvalidRva { rva: name_rva })?;
        let dll_name = read_cstring(data, name_offset, 256)?.to_string();

        let symbols = parse_thunks(
            data,
            sections,
            original_first_thunk,
            first_thunk,
            is_64bit,
            MAX_IMPORTS - total,
        )?;
        total += symbols.len();

        modules.push(ImportedModule {
            name: dll_name,
            symbols,
        });

        offset += 20;
        if total >= MAX_IMPORTS {
            break;
        }
    }

    Ok(modules)
}

fn parse_thunks(
    data: &[u8],
    sections: &SectionTable,
    original_first_thunk: u32,
    first_thunk: u32,
    is_64bit: bool,
    max_count: usize,
) -> Result<Vec<ImportedSymbol>> {
    let mut symbols = Vec::new();

    // The lookup table is authoritative; fall back to the bound IAT
    let thunk_rva = if original_first_thunk != 0 {
        original_first_thunk
    } else {
        first_thunk
    };
    if thunk_rva == 0 {
        return Ok(symbols);
    }

    let mut thunk_offset = sections
        .rva_to_offset(thunk_rva)
        .ok_or(PeError::InvalidRva { rva: thunk_rva })?;
    let entry_size = if is_64bit { 8 } else { 4 };

    while symbols.len() < max_count {
        if thunk_offset + entry_size > data.len() {
            break;
        }
        let val = if is_64bit {
            data.read_u64_le_at(thunk_offset)
                .ok_or(PeError::InvalidOffset {
                    offset: thunk_offset,
                })?
        } else {
            data.read_u32_le_at(thunk_offset)
                .ok_or(PeError::InvalidOffset {
                    offset: thunk_offset,
                })? as u64
        };
        if val == 0 {
            break;
        }

        let is_ordinal = if is_64bit {
            (val & (1u64 << 63)) != 0
        } else {
            (val & (1u64 << 31)) != 0
        };

        if is_ordinal {
            symbols.push(ImportedSymbol::Ordinal((val & 0xFFFF) as u16));
        } else {
            let hint_name_rva = (val & 0x7FFF_FFFF) as u32;
            if let Some(hint_offset) = sections.rva_to_offset(hint_name_rva) {
                // Skip the 2-byte hint in front of the name
                if let Some(name) = data.read_cstring_at(hint_offset + 2, 512) {
                    symbols.push(ImportedSymbol::Name(name.to_string()));
                }
            }
        }

        thunk_offset += entry_size;
    }

    Ok(symbols)
}

/// Compute the canonical import hash over modules in file order.
///
/// Every `(module, function)` pair becomes `module.function`: module base
/// name lower-cased with its extension dropped, function lower-cased or
/// `ord<N>` for ordinal imports. Entries are joined with commas and digested
/// with MD5.
/// Returns `None` when no symbol was imported at all.
pub fn import_hash(modules: &[ImportedModule]) -> Option<String> {
    let mut entries: Vec<String> = Vec::new();
    for module in modules {
        let base = module_base_name(&module.name);
        for symbol in &module.symbols {
            let func = match symbol {
                ImportedSymbol::Name(n) => n.to_ascii_lowercase(),
                ImportedSymbol::Ordinal(n) => format!("ord{}", n),
            };
            entries.push(format!("{}.{}", base, func));
        }
    }
    if entries.is_empty() {
        return None;
    }
    let joined = entries.join(",");
    Some(format!("{:032x}", md5::compute(joined.as_bytes())))
}

fn module_base_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match lower.rsplit_once('.') {
        Some((base, _ext)) if !base.is_empty() => base.to_string(),
        _ => lower,
    }
}
