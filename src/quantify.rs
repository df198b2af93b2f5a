
use std::mem::{size_of};
use std::collections::BTreeMap;

// See https://users.rust-lang.org/t/deriving-the-implementation-of-trait-for-structs/25730/9
// The `Quantifiable` derive of `quantifiable-derive` expands to implementations of `crate::quantify::Quantifiable`.

///Memory accounting of the routing state, so that a simulator can add it to its own accounting.
pub trait Quantifiable
{
	/// Get the total memory currently being employed by the implementing type. Both stack and heap.
	fn total_memory(&self) -> usize;
	/// Prints by stdout how much memory is used per component.
	fn print_memory_breakdown(&self);
	/// Get an estimation on how much memory the type could reach during the simulation.
	/// Routing state does not grow after construction, so it usually equals `total_memory`.
	fn forecast_total_memory(&self) -> usize;
}

impl<T:Quantifiable> Quantifiable for Vec<T>
{
	fn total_memory(&self) -> usize
	{
		return size_of::<Vec<T>>() + self.iter().map(|e|e.total_memory()).sum::<usize>() + (self.capacity()-self.len())*size_of::<T>();
	}
	fn print_memory_breakdown(&self)
	{
		println!("Vec of {} elements: {} bytes",self.len(),self.total_memory());
	}
	fn forecast_total_memory(&self) -> usize
	{
		self.total_memory()
	}
}

impl<A:Quantifiable, B:Quantifiable> Quantifiable for BTreeMap<A,B>
{
	fn total_memory(&self) -> usize
	{
		return size_of::<Self>() + self.iter().map(|(a,b)|a.total_memory()+b.total_memory()).sum::<usize>();
	}
	fn print_memory_breakdown(&self)
	{
		println!("BTreeMap of {} entries: {} bytes",self.len(),self.total_memory());
	}
	fn forecast_total_memory(&self) -> usize
	{
		self.total_memory()
	}
}

macro_rules! quantifiable_simple
{
	($t:ty) =>
	{
		impl Quantifiable for $t
		{
			fn total_memory(&self) -> usize
			{
				return size_of::<$t>();
			}
			fn print_memory_breakdown(&self)
			{
				println!("{}: {} bytes",stringify!($t),size_of::<$t>());
			}
			fn forecast_total_memory(&self) -> usize
			{
				return size_of::<$t>();
			}
		}
	}
}

quantifiable_simple!(i32);
quantifiable_simple!(usize);

pub fn human_bytes(byte_amount:usize) -> String
{
	if byte_amount<3000
	{
		return format!("{} bytes",byte_amount);
	}
	let kb_amount=byte_amount as f64 / 1024.;
	if kb_amount<3000f64
	{
		return format!("{} KB",kb_amount);
	}
	let mb_amount=kb_amount / 1024.;
	if mb_amount<3000f64
	{
		return format!("{} MB",mb_amount);
	}
	let gb_amount=mb_amount / 1024.;
	return format!("{} GB",gb_amount);
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn vec_counts_spare_capacity()
	{
		let mut v:Vec<usize>=Vec::with_capacity(8);
		v.push(1);
		assert_eq!(v.total_memory(),size_of::<Vec<usize>>()+8*size_of::<usize>());
	}

	#[test]
	fn human_bytes_scales()
	{
		assert_eq!(human_bytes(100),"100 bytes");
		assert_eq!(human_bytes(4096),"4 KB");
	}
}
