use rustfst::prelude::*;
use std::fmt;
use std::io::prelude::*;
use std::sync::Arc;

use crate::emit::{ArcLabel, ArcList, ArcRecord, HUB_STATE};
use crate::error::Result;
use crate::StdVectorFst;

impl fmt::Display for ArcRecord {
    /// `<from> <to> <input> <output> <weight>`, weight in shortest
    /// round-trip form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.from, self.to, self.ilabel, self.olabel, self.weight
        )
    }
}

impl ArcList {
    /// Write the arcs in AT&T text format, one per line
    pub fn write_att<W: Write>(&self, out: &mut W) -> Result<()> {
        for arc in &self.arcs {
            writeln!(out, "{}", arc)?;
        }
        Ok(())
    }

    /// AT&T text as a string
    pub fn to_att_string(&self) -> String {
        self.arcs.iter().map(|arc| format!("{}\n", arc)).collect()
    }

    /// Build an in-memory transducer with the hub as start and final
    /// state.  Input and output symbols share one table with `<eps>` as
    /// label 0.
    pub fn to_vector_fst(&self) -> Result<StdVectorFst> {
        let mut syms = SymbolTable::new();
        let mut label = |l: &ArcLabel| match l {
            ArcLabel::Eps => EPS_LABEL,
            ArcLabel::Word(word) => syms.add_symbol(word.as_str()),
        };
        let trs: Vec<(StateId, Tr<TropicalWeight>)> = self
            .arcs
            .iter()
            .map(|arc| {
                let ilabel = label(&arc.ilabel);
                let olabel = label(&arc.olabel);
                (
                    arc.from,
                    Tr::new(ilabel, olabel, TropicalWeight::new(arc.weight as f32), arc.to),
                )
            })
            .collect();

        let mut fst = StdVectorFst::new();
        fst.add_states(self.num_states);
        fst.set_start(HUB_STATE)?;
        fst.set_final(HUB_STATE, TropicalWeight::one())?;
        for (state, tr) in trs {
            fst.add_tr(state, tr)?;
        }
        let syms = Arc::new(syms);
        fst.set_input_symbols(Arc::clone(&syms));
        fst.set_output_symbols(Arc::clone(&syms));
        Ok(fst)
    }
}
