/*!
Arithmetic of the butterfly built with `k=ceil(log2(num_routers))` stages, where at stage `i` the router `r` is linked to the router `r^(1<<i)`.

A packet corrects at each hop the highest bit in which the current router and the destination differ. It leaves by `Up_s<i>` when the destination has that bit set and by `Down_s<i>` otherwise.
*/

use crate::error::Error;
use super::check_router;

///Number of stages of a butterfly of `num_routers` routers, `ceil(log2(num_routers))`.
pub fn butterfly_stages(num_routers:usize) -> usize
{
	let mut k=0;
	while (1usize<<k) < num_routers
	{
		k+=1;
	}
	k
}

///The stage to correct going from `origin` to `destination` and whether the link goes up at that stage.
///Returns `None` when both are the same router.
pub fn butterfly_hop(origin:usize, destination:usize, num_routers:usize) -> Result<Option<(usize,bool)>,Error>
{
	check_router(origin,num_routers)?;
	check_router(destination,num_routers)?;
	let diff=origin^destination;
	if diff==0
	{
		return Ok(None);
	}
	//Highest set bit. It is below `butterfly_stages(num_routers)` because both indices are.
	let stage=(usize::BITS - 1 - diff.leading_zeros()) as usize;
	let up=(destination>>stage)&1 == 1;
	Ok(Some((stage,up)))
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn stages_round_up()
	{
		assert_eq!(butterfly_stages(1),0);
		assert_eq!(butterfly_stages(2),1);
		assert_eq!(butterfly_stages(8),3);
		assert_eq!(butterfly_stages(9),4);
	}

	#[test]
	fn highest_differing_bit_is_corrected()
	{
		//2=010 and 5=101 differ in 111; stage 2, bit of 5 set.
		assert_eq!(butterfly_hop(2,5,8).unwrap(),Some((2,true)));
		//5=101 to 2=010, stage 2, bit of 2 clear.
		assert_eq!(butterfly_hop(5,2,8).unwrap(),Some((2,false)));
		//4=100 to 5=101 differ only in bit 0.
		assert_eq!(butterfly_hop(4,5,8).unwrap(),Some((0,true)));
		assert_eq!(butterfly_hop(3,3,8).unwrap(),None);
	}

	#[test]
	fn stage_is_below_stage_count()
	{
		let n=6;
		let k=butterfly_stages(n);
		for a in 0..n
		{
			for b in 0..n
			{
				if let Some((stage,_))=butterfly_hop(a,b,n).unwrap()
				{
					assert!(stage<k);
				}
			}
		}
		assert!(butterfly_hop(0,6,6).is_err());
	}
}
