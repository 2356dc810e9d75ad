//! Portable implementation which does not rely on architecture-specific
//! intrinsics.

use crate::{TriviumCore, Word};
use cipher::{consts::U1, Block, BlockSizeUser, ParBlocksSizeUser, StreamBackend};

pub(crate) struct Backend<'a, W: Word>(pub(crate) &'a mut TriviumCore<W>);

impl<W: Word> BlockSizeUser for Backend<'_, W> {
    type BlockSize = W::BlockSize;
}

impl<W: Word> ParBlocksSizeUser for Backend<'_, W> {
    type ParBlocksSize = U1;
}

impl<W: Word> StreamBackend for Backend<'_, W> {
    #[inline(always)]
    fn gen_ks_block(&mut self, block: &mut Block<Self>) {
        self.0.next_bytes(block);
    }
}
